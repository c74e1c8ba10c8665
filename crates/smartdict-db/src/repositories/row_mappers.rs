//! Row mapping helpers for `SQLite` queries.

use chrono::{DateTime, Utc};
use smartdict_core::{
    DictationItem, HistoryEntry, Language, Mode, RepositoryError, SavedDictation, UserProfile,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

pub const USER_SELECT_COLUMNS: &str = "id, name, avatar, is_custom, theme_color";
pub const PRESET_SELECT_COLUMNS: &str = "id, user_id, title, language, mode, items, created_at";
pub const HISTORY_SELECT_COLUMNS: &str =
    "id, user_id, recorded_at, language, mode, item_count, elapsed_seconds";

pub fn storage_err(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name).map_err(storage_err)
}

fn parse_language(raw: &str) -> Result<Language, RepositoryError> {
    raw.parse().map_err(RepositoryError::Serialization)
}

fn parse_mode(raw: &str) -> Result<Mode, RepositoryError> {
    raw.parse().map_err(RepositoryError::Serialization)
}

/// Convert a stored count back to `usize`, clamping corrupt negatives to 0.
fn to_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

pub fn to_i64(value: impl TryInto<i64>) -> i64 {
    value.try_into().unwrap_or(i64::MAX)
}

pub fn row_to_user(row: &SqliteRow) -> Result<UserProfile, RepositoryError> {
    Ok(UserProfile {
        id: column(row, "id")?,
        name: column(row, "name")?,
        avatar: column(row, "avatar")?,
        is_custom: column(row, "is_custom")?,
        theme_color: column(row, "theme_color")?,
    })
}

pub fn row_to_preset(row: &SqliteRow) -> Result<SavedDictation, RepositoryError> {
    let items_json: String = column(row, "items")?;
    let items: Vec<DictationItem> = serde_json::from_str(&items_json)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    let language: String = column(row, "language")?;
    let mode: String = column(row, "mode")?;
    let created_at: DateTime<Utc> = column(row, "created_at")?;

    Ok(SavedDictation {
        id: column(row, "id")?,
        user_id: column(row, "user_id")?,
        title: column(row, "title")?,
        language: parse_language(&language)?,
        mode: parse_mode(&mode)?,
        items,
        created_at,
    })
}

pub fn row_to_history(row: &SqliteRow) -> Result<HistoryEntry, RepositoryError> {
    let language: String = column(row, "language")?;
    let mode: String = column(row, "mode")?;
    let item_count: i64 = column(row, "item_count")?;
    let elapsed: i64 = column(row, "elapsed_seconds")?;
    let recorded_at: DateTime<Utc> = column(row, "recorded_at")?;

    Ok(HistoryEntry {
        id: column(row, "id")?,
        user_id: column(row, "user_id")?,
        recorded_at,
        language: parse_language(&language)?,
        mode: parse_mode(&mode)?,
        item_count: to_usize(item_count),
        elapsed_seconds: u64::try_from(elapsed).unwrap_or(0),
    })
}
