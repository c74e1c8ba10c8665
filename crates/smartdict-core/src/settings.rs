//! Settings domain types and validation.
//!
//! This module contains the application settings used to seed each session's
//! playback settings and to wire the speech and cue adapters. These are pure
//! domain types with no infrastructure dependencies.

use serde::{Deserialize, Serialize};

use crate::domain::{MAX_RATE, MIN_RATE, Mode, PlaybackSettings};

/// Default speech engine binary.
pub const DEFAULT_SPEECH_BINARY: &str = "espeak-ng";

/// Application settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Initial volume for new sessions (0.0–1.0).
    pub default_volume: Option<f32>,

    /// Initial speech rate for vocabulary sessions.
    pub vocabulary_rate: Option<f32>,

    /// Initial speech rate for passage sessions.
    pub passage_rate: Option<f32>,

    /// Audio file played after the end phrase.
    pub end_cue: Option<String>,

    /// Speech engine executable (`espeak-ng` or `espeak`).
    pub speech_binary: Option<String>,

    /// User whose history is recorded when none is given on the command line.
    pub default_user_id: Option<String>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            default_volume: Some(1.0),
            vocabulary_rate: Some(0.7),
            passage_rate: Some(0.6),
            end_cue: None,
            speech_binary: Some(DEFAULT_SPEECH_BINARY.to_string()),
            default_user_id: None,
        }
    }

    /// Initial playback settings for a session in `mode`.
    #[must_use]
    pub fn playback_for(&self, mode: Mode) -> PlaybackSettings {
        let defaults = PlaybackSettings::for_mode(mode);
        let rate = match mode {
            Mode::Vocabulary => self.vocabulary_rate,
            Mode::Passage => self.passage_rate,
        };
        PlaybackSettings::new(
            self.default_volume.unwrap_or(defaults.volume()),
            rate.unwrap_or(defaults.rate()),
        )
    }

    /// Get the effective speech binary (with default fallback).
    #[must_use]
    pub fn effective_speech_binary(&self) -> &str {
        self.speech_binary
            .as_deref()
            .unwrap_or(DEFAULT_SPEECH_BINARY)
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(volume) = other.default_volume {
            self.default_volume = volume;
        }
        if let Some(rate) = other.vocabulary_rate {
            self.vocabulary_rate = rate;
        }
        if let Some(rate) = other.passage_rate {
            self.passage_rate = rate;
        }
        if let Some(ref cue) = other.end_cue {
            self.end_cue.clone_from(cue);
        }
        if let Some(ref binary) = other.speech_binary {
            self.speech_binary.clone_from(binary);
        }
        if let Some(ref user) = other.default_user_id {
            self.default_user_id.clone_from(user);
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub default_volume: Option<Option<f32>>,
    pub vocabulary_rate: Option<Option<f32>>,
    pub passage_rate: Option<Option<f32>>,
    pub end_cue: Option<Option<String>>,
    pub speech_binary: Option<Option<String>>,
    pub default_user_id: Option<Option<String>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Volume must be between 0.0 and 1.0, got {0}")]
    InvalidVolume(f32),

    #[error("Speech rate must be between {MIN_RATE} and {MAX_RATE}, got {0}")]
    InvalidRate(f32),

    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    #[error("'{value}' is not a number for {key}")]
    NotANumber { key: String, value: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(volume) = settings.default_volume {
        if !(0.0..=1.0).contains(&volume) {
            return Err(SettingsError::InvalidVolume(volume));
        }
    }

    for rate in [settings.vocabulary_rate, settings.passage_rate]
        .into_iter()
        .flatten()
    {
        if !(MIN_RATE..=MAX_RATE).contains(&rate) {
            return Err(SettingsError::InvalidRate(rate));
        }
    }

    if settings.end_cue.as_ref().is_some_and(|p| p.trim().is_empty()) {
        return Err(SettingsError::Empty("end_cue"));
    }

    if settings
        .speech_binary
        .as_ref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(SettingsError::Empty("speech_binary"));
    }

    Ok(())
}

/// Build a single-field update from a `key=value` pair as typed on the
/// command line. An empty value clears the field.
pub fn parse_update(key: &str, value: &str) -> Result<SettingsUpdate, SettingsError> {
    let value = value.trim();
    let text = (!value.is_empty()).then(|| value.to_string());
    let number = || -> Result<Option<f32>, SettingsError> {
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse::<f32>()
            .map(Some)
            .map_err(|_| SettingsError::NotANumber {
                key: key.to_string(),
                value: value.to_string(),
            })
    };

    let mut update = SettingsUpdate::default();
    match key {
        "default_volume" => update.default_volume = Some(number()?),
        "vocabulary_rate" => update.vocabulary_rate = Some(number()?),
        "passage_rate" => update.passage_rate = Some(number()?),
        "end_cue" => update.end_cue = Some(text),
        "speech_binary" => update.speech_binary = Some(text),
        "default_user_id" => update.default_user_id = Some(text),
        other => return Err(SettingsError::UnknownKey(other.to_string())),
    }
    Ok(update)
}
