//! Core services: orchestration between ports and domain logic.
//!
//! Services here don't know about concrete implementations.

mod history;
mod library;
mod settings_service;
mod users;

pub use history::{HistoryRecorder, HistoryService};
pub use library::LibraryService;
pub use settings_service::SettingsService;
pub use users::{AVATAR_PRESETS, UserService};
