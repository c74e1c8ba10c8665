//! Voice crate error types.

use std::path::PathBuf;

use crate::sequencer::SequencerStatus;

/// Errors raised by the speech and audio adapters.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// The speech engine binary could not be started.
    #[error("Failed to start speech engine '{binary}': {source}")]
    EngineSpawn {
        binary: String,
        source: std::io::Error,
    },

    /// Failed to open the audio output device.
    #[error("Failed to open audio output stream: {0}")]
    OutputStreamError(String),

    /// Audio cue file not found.
    #[error("Audio cue not found at {0}")]
    CueNotFound(PathBuf),

    /// Audio cue file could not be decoded.
    #[error("Failed to decode audio cue: {0}")]
    CueDecode(String),

    /// The dedicated audio thread is gone.
    #[error("Audio thread died unexpectedly")]
    AudioThreadDied,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by [`PlaybackSequencer`](crate::PlaybackSequencer) commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequencerError {
    /// `start()` was called on a sequencer that already ran.
    #[error("Sequencer cannot start from {0:?}; create a new one to run again")]
    NotIdle(SequencerStatus),

    /// `start()` was called outside a tokio runtime.
    #[error("Sequencer must be started from within a tokio runtime")]
    NoRuntime,
}
