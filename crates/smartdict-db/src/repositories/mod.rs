//! Repository implementations using `SQLite`.
//!
//! The `SqlitePool` is confined to this module and never exposed through
//! the port trait signatures.

mod row_mappers;
mod sqlite_history_repository;
mod sqlite_library_repository;
mod sqlite_settings_repository;
mod sqlite_user_repository;

pub use sqlite_history_repository::SqliteHistoryRepository;
pub use sqlite_library_repository::SqliteLibraryRepository;
pub use sqlite_settings_repository::SqliteSettingsRepository;
pub use sqlite_user_repository::SqliteUserRepository;
