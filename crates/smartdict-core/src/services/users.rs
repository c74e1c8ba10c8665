//! User service - learner profiles.

use std::sync::Arc;

use tracing::info;

use crate::domain::{NewUser, UserProfile};
use crate::ports::{CoreError, UserRepository};

/// Emoji avatars offered when creating a profile.
pub const AVATAR_PRESETS: [&str; 4] = ["🐻", "🐰", "🐱", "🐶"];

pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<UserProfile>, CoreError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get(&self, id: &str) -> Result<UserProfile, CoreError> {
        Ok(self.repo.get(id).await?)
    }

    /// Create a profile. The name is trimmed and must be non-empty; a missing
    /// avatar falls back to the first preset.
    pub async fn create(&self, new_user: NewUser) -> Result<UserProfile, CoreError> {
        let name = new_user.name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("user name cannot be empty".into()));
        }
        let avatar = if new_user.avatar.trim().is_empty() {
            AVATAR_PRESETS[0].to_string()
        } else {
            new_user.avatar
        };

        let profile = NewUser {
            name: name.to_string(),
            avatar,
            is_custom: new_user.is_custom,
        }
        .into_profile();
        self.repo.insert(&profile).await?;
        info!(id = %profile.id, name = %profile.name, "Created user");
        Ok(profile)
    }

    /// Delete a user along with their presets and history.
    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.repo.delete(id).await?;
        info!(%id, "Deleted user");
        Ok(())
    }
}
