//! Library (saved presets) repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{NewSavedDictation, SavedDictation};

/// Storage for a user's saved dictations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    async fn save(&self, preset: NewSavedDictation) -> Result<SavedDictation, RepositoryError>;

    /// Presets for a user, newest first.
    async fn list(&self, user_id: &str) -> Result<Vec<SavedDictation>, RepositoryError>;

    async fn get(&self, user_id: &str, id: i64) -> Result<SavedDictation, RepositoryError>;

    async fn delete(&self, user_id: &str, id: i64) -> Result<(), RepositoryError>;
}
