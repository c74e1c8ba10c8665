//! Learner profiles.

use serde::{Deserialize, Serialize};

/// A learner using the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    /// Emoji, URL, or base64 image data.
    pub avatar: String,
    /// Whether `avatar` is an uploaded image rather than an emoji.
    pub is_custom: bool,
    pub theme_color: Option<String>,
}

/// Data needed to create a profile.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub avatar: String,
    pub is_custom: bool,
}

impl NewUser {
    /// Materialize the profile with a fresh id and the default theme.
    #[must_use]
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            id: uuid::Uuid::new_v4().to_string(),
            name: self.name,
            avatar: self.avatar,
            is_custom: self.is_custom,
            theme_color: Some("blue".to_string()),
        }
    }
}
