//! Concrete speech and audio adapters.

mod espeak;
#[cfg(feature = "rodio")]
mod rodio_cue;

pub use espeak::EspeakSpeechProvider;
#[cfg(feature = "rodio")]
pub use rodio_cue::RodioCuePlayer;
