//! Domain types for dictation sessions, presets, history and users.
//!
//! These types represent the domain model independent of any
//! infrastructure concerns.

pub mod history;
pub mod item;
pub mod language;
pub mod library;
pub mod session;
pub mod user;

pub use history::{HISTORY_LIMIT, HistoryEntry, HistoryRecord};
pub use item::{DictationItem, items_from_lines};
pub use language::{Language, LanguageProfile};
pub use library::{NewSavedDictation, SavedDictation};
pub use session::{MAX_RATE, MIN_RATE, Mode, PlaybackSettings, SessionConfig};
pub use user::{NewUser, UserProfile};
