#![doc = include_str!("../README.md")]

pub mod backend;
pub mod error;
pub mod sequencer;
pub mod speech;
pub mod timing;
pub mod voice_select;

// Re-export key types for convenience
pub use backend::EspeakSpeechProvider;
#[cfg(feature = "rodio")]
pub use backend::RodioCuePlayer;
pub use error::{SequencerError, VoiceError};
pub use sequencer::{
    DEFAULT_END_CUE, PlaybackSequencer, SequencerConfig, SequencerDeps, SequencerEvent,
    SequencerSnapshot, SequencerStatus, SessionSummary,
};
pub use voice_select::select_voice;
