//! `SQLite` implementation of the `UserRepository` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;

use smartdict_core::{RepositoryError, UserProfile, UserRepository};

use super::row_mappers::{USER_SELECT_COLUMNS, row_to_user, storage_err};

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn list(&self) -> Result<Vec<UserProfile>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_SELECT_COLUMNS} FROM users ORDER BY created_at ASC, rowid ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter().map(row_to_user).collect()
    }

    async fn insert(&self, user: &UserProfile) -> Result<(), RepositoryError> {
        let created_at = chrono::Utc::now();
        sqlx::query(
            "INSERT INTO users (id, name, avatar, is_custom, theme_color, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.avatar)
        .bind(user.is_custom)
        .bind(&user.theme_color)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                RepositoryError::AlreadyExists(user.id.clone())
            } else {
                storage_err(e)
            }
        })?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<UserProfile, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_SELECT_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?
        .ok_or_else(|| RepositoryError::NotFound(format!("user {id}")))?;

        row_to_user(&row)
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {id}")));
        }

        for table in ["presets", "history"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE user_id = ?"))
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
        }

        tx.commit().await.map_err(storage_err)?;
        Ok(())
    }
}
