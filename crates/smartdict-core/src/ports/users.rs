//! User profile repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::UserProfile;

/// Storage for learner profiles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<UserProfile>, RepositoryError>;

    async fn insert(&self, user: &UserProfile) -> Result<(), RepositoryError>;

    async fn get(&self, id: &str) -> Result<UserProfile, RepositoryError>;

    /// Delete a user together with their presets and history.
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}
