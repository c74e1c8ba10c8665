//! `SQLite` implementation of the `HistoryRepository` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use smartdict_core::{HistoryEntry, HistoryRecord, HistoryRepository, RepositoryError};

use super::row_mappers::{HISTORY_SELECT_COLUMNS, row_to_history, storage_err, to_i64};

pub struct SqliteHistoryRepository {
    pool: SqlitePool,
}

impl SqliteHistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for SqliteHistoryRepository {
    async fn insert(
        &self,
        user_id: &str,
        record: &HistoryRecord,
        keep: usize,
    ) -> Result<i64, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let id = sqlx::query(
            "INSERT INTO history (user_id, recorded_at, language, mode, item_count, elapsed_seconds) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(chrono::Utc::now())
        .bind(record.language.as_str())
        .bind(record.mode.as_str())
        .bind(to_i64(record.item_count))
        .bind(to_i64(record.elapsed_seconds))
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?
        .last_insert_rowid();

        let trimmed = sqlx::query(
            "DELETE FROM history WHERE user_id = ? AND id NOT IN (
                SELECT id FROM history WHERE user_id = ? ORDER BY id DESC LIMIT ?
            )",
        )
        .bind(user_id)
        .bind(user_id)
        .bind(to_i64(keep))
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?
        .rows_affected();

        tx.commit().await.map_err(storage_err)?;

        if trimmed > 0 {
            debug!(%user_id, trimmed, "Trimmed old history entries");
        }
        Ok(id)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<HistoryEntry>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {HISTORY_SELECT_COLUMNS} FROM history WHERE user_id = ? ORDER BY id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter().map(row_to_history).collect()
    }

    async fn clear(&self, user_id: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM history WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }
}
