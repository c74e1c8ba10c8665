//! Dictation item domain type.

use serde::{Deserialize, Serialize};

/// One unit of dictation content: a vocabulary word or a passage chunk.
///
/// `display_text` is what the learner sees; `spoken_text`, when present and
/// non-empty, replaces it for synthesis (e.g. punctuation spelled out as
/// "comma").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictationItem {
    pub id: String,
    #[serde(alias = "text")]
    pub display_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoken_text: Option<String>,
}

impl DictationItem {
    /// Create an item whose spoken form equals its display form.
    pub fn new(display_text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            display_text: display_text.into(),
            spoken_text: None,
        }
    }

    /// Attach a spoken override.
    #[must_use]
    pub fn with_spoken(mut self, spoken: impl Into<String>) -> Self {
        self.spoken_text = Some(spoken.into());
        self
    }

    /// The text handed to the speech provider.
    #[must_use]
    pub fn text_to_speak(&self) -> &str {
        match self.spoken_text.as_deref() {
            Some(spoken) if !spoken.is_empty() => spoken,
            _ => &self.display_text,
        }
    }
}

/// Split raw text into one item per non-blank line.
pub fn items_from_lines(raw: &str) -> Vec<DictationItem> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(DictationItem::new)
        .collect()
}
