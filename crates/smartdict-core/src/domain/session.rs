//! Session configuration and operator playback settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::item::DictationItem;
use super::language::{Language, LanguageProfile};

/// How items are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Each word is read several times, then all words are reviewed once slowly.
    Vocabulary,
    /// Each section is read several times in a single pass.
    Passage,
}

impl Mode {
    /// Stable storage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vocabulary => "VOCABULARY",
            Self::Passage => "PASSAGE",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vocabulary" | "vocab" | "words" => Ok(Self::Vocabulary),
            "passage" | "text" => Ok(Self::Passage),
            other => Err(format!("unknown mode '{other}' (expected vocabulary or passage)")),
        }
    }
}

/// Immutable parameters for one dictation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub items: Vec<DictationItem>,
    pub language: Language,
    pub mode: Mode,
}

impl SessionConfig {
    pub const fn new(items: Vec<DictationItem>, language: Language, mode: Mode) -> Self {
        Self {
            items,
            language,
            mode,
        }
    }

    #[must_use]
    pub const fn profile(&self) -> &'static LanguageProfile {
        self.language.profile()
    }

    /// Parse a session from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Lowest accepted speech rate.
pub const MIN_RATE: f32 = 0.1;
/// Highest accepted speech rate.
pub const MAX_RATE: f32 = 1.5;

/// Operator-adjustable volume and rate.
///
/// Values are clamped into range on construction and on every update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPlaybackSettings")]
pub struct PlaybackSettings {
    volume: f32,
    rate: f32,
}

/// Wire shape of [`PlaybackSettings`], clamped on conversion.
#[derive(Deserialize)]
struct RawPlaybackSettings {
    volume: f32,
    rate: f32,
}

impl From<RawPlaybackSettings> for PlaybackSettings {
    fn from(raw: RawPlaybackSettings) -> Self {
        Self::new(raw.volume, raw.rate)
    }
}

impl PlaybackSettings {
    #[must_use]
    pub fn new(volume: f32, rate: f32) -> Self {
        Self {
            volume: clamp_volume(volume),
            rate: clamp_rate(rate),
        }
    }

    /// Full volume at the default rate for `mode` (0.7 for vocabulary,
    /// 0.6 for passages).
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        let rate = match mode {
            Mode::Vocabulary => 0.7,
            Mode::Passage => 0.6,
        };
        Self::new(1.0, rate)
    }

    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.volume
    }

    #[must_use]
    pub const fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = clamp_rate(rate);
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        1.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

fn clamp_rate(rate: f32) -> f32 {
    if rate.is_nan() {
        1.0
    } else {
        rate.clamp(MIN_RATE, MAX_RATE)
    }
}
