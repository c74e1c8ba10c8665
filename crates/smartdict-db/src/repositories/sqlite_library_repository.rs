//! `SQLite` implementation of the `LibraryRepository` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;

use smartdict_core::{LibraryRepository, NewSavedDictation, RepositoryError, SavedDictation};

use super::row_mappers::{PRESET_SELECT_COLUMNS, row_to_preset, storage_err};

/// Saved dictations, one row per preset with items as a JSON array.
pub struct SqliteLibraryRepository {
    pool: SqlitePool,
}

impl SqliteLibraryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LibraryRepository for SqliteLibraryRepository {
    async fn save(&self, preset: NewSavedDictation) -> Result<SavedDictation, RepositoryError> {
        let items = serde_json::to_string(&preset.items)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let created_at = chrono::Utc::now();

        let result = sqlx::query(
            "INSERT INTO presets (user_id, title, language, mode, items, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&preset.user_id)
        .bind(&preset.title)
        .bind(preset.language.as_str())
        .bind(preset.mode.as_str())
        .bind(&items)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(SavedDictation {
            id: result.last_insert_rowid(),
            user_id: preset.user_id,
            title: preset.title,
            language: preset.language,
            mode: preset.mode,
            items: preset.items,
            created_at,
        })
    }

    async fn list(&self, user_id: &str) -> Result<Vec<SavedDictation>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRESET_SELECT_COLUMNS} FROM presets WHERE user_id = ? ORDER BY id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter().map(row_to_preset).collect()
    }

    async fn get(&self, user_id: &str, id: i64) -> Result<SavedDictation, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {PRESET_SELECT_COLUMNS} FROM presets WHERE user_id = ? AND id = ?"
        ))
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?
        .ok_or_else(|| RepositoryError::NotFound(format!("preset {id}")))?;

        row_to_preset(&row)
    }

    async fn delete(&self, user_id: &str, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM presets WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("preset {id}")));
        }
        Ok(())
    }
}
