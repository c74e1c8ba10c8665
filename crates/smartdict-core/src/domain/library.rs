//! Saved dictation presets (the user's library).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::DictationItem;
use super::language::Language;
use super::session::{Mode, SessionConfig};

/// A dictation saved for reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDictation {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub language: Language,
    pub mode: Mode,
    pub items: Vec<DictationItem>,
    pub created_at: DateTime<Utc>,
}

impl SavedDictation {
    /// Build a runnable session from this preset.
    #[must_use]
    pub fn to_session(&self) -> SessionConfig {
        SessionConfig::new(self.items.clone(), self.language, self.mode)
    }
}

/// Data needed to save a new preset.
#[derive(Debug, Clone)]
pub struct NewSavedDictation {
    pub user_id: String,
    pub title: String,
    pub language: Language,
    pub mode: Mode,
    pub items: Vec<DictationItem>,
}

impl NewSavedDictation {
    /// Create a preset, substituting the localized "untitled" label for a
    /// blank title.
    pub fn new(user_id: impl Into<String>, title: &str, session: &SessionConfig) -> Self {
        let title = title.trim();
        let title = if title.is_empty() {
            session.profile().untitled().to_string()
        } else {
            title.to_string()
        };
        Self {
            user_id: user_id.into(),
            title,
            language: session.language,
            mode: session.mode,
            items: session.items.clone(),
        }
    }
}
