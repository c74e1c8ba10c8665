//! History repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{HistoryEntry, HistoryRecord};

/// Storage for finished-session history, per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Insert a record, then drop everything beyond the newest `keep`
    /// entries for that user.
    async fn insert(
        &self,
        user_id: &str,
        record: &HistoryRecord,
        keep: usize,
    ) -> Result<i64, RepositoryError>;

    /// Entries for a user, newest first.
    async fn list(&self, user_id: &str) -> Result<Vec<HistoryEntry>, RepositoryError>;

    /// Delete all history for a user.
    async fn clear(&self, user_id: &str) -> Result<(), RepositoryError>;
}
