//! Speech provider port.
//!
//! The playback sequencer depends only on this narrow capability contract;
//! platform engines (espeak-ng, cloud voices, test fakes) live behind it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One utterance to synthesize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRequest {
    pub text: String,
    /// BCP-47 style locale of the language profile (e.g. `zh-HK`).
    pub language_tag: String,
    /// Rate multiplier (1.0 = engine default).
    pub rate: f32,
    /// Volume in `[0, 1]`.
    pub volume: f32,
    /// Catalog voice id chosen for this request; `None` means the engine
    /// default voice.
    pub voice: Option<String>,
}

/// A voice offered by the speech engine's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceInfo {
    /// Identifier passed back to the engine.
    pub id: String,
    /// Human-readable name (used for preference matching).
    pub name: String,
    /// Locale tag as reported by the engine (`en-GB`, `en_GB`, `yue`, ...).
    pub locale: String,
}

impl VoiceInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            locale: locale.into(),
        }
    }
}

/// Failures reported by a speech engine.
///
/// The sequencer never propagates these; they are logged and treated as a
/// completed utterance.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The engine binary or device is missing.
    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),

    /// The engine started but failed to synthesize.
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    /// IO error talking to the engine.
    #[error("Speech engine IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend-agnostic speech engine.
///
/// `speak` resolves when the utterance ends, fails, or is cancelled via
/// [`cancel_all`](SpeechProvider::cancel_all). The control methods are
/// synchronous and idempotent.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Speak one utterance and wait for it to finish.
    async fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError>;

    /// Suspend the utterance in flight.
    fn pause(&self);

    /// Continue a suspended utterance.
    fn resume(&self);

    /// Abort every pending and in-flight utterance.
    fn cancel_all(&self);

    /// Current voice catalog. May be empty while the engine is still
    /// enumerating voices; callers re-query per request.
    fn voices(&self) -> Vec<VoiceInfo>;
}
