//! Session history domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::language::Language;
use super::session::Mode;

/// Summary of one finished (or stopped) session, produced exactly once on
/// the terminal transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub language: Language,
    pub mode: Mode,
    pub item_count: usize,
    pub elapsed_seconds: u64,
}

/// A persisted history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub user_id: String,
    pub recorded_at: DateTime<Utc>,
    pub language: Language,
    pub mode: Mode,
    pub item_count: usize,
    pub elapsed_seconds: u64,
}

/// Number of history entries retained per user.
pub const HISTORY_LIMIT: usize = 50;
