//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure: the speech engine, the audio cue player, the session
//! recorder, and the repositories backing users, presets, history and
//! settings.
//!
//! # Design Rules
//!
//! - No `sqlx` types in any signature
//! - No process/audio-device implementation details
//! - Repository traits are minimal and CRUD-focused

pub mod audio_cue;
pub mod history;
pub mod library;
pub mod recorder;
pub mod settings_repository;
pub mod speech;
pub mod users;

use std::sync::Arc;
use thiserror::Error;

pub use audio_cue::{AudioCuePlayer, NoopCuePlayer};
pub use history::HistoryRepository;
pub use library::LibraryRepository;
pub use recorder::{NoopRecorder, SessionRecorder};
pub use settings_repository::SettingsRepository;
pub use speech::{SpeechError, SpeechProvider, SpeechRequest, VoiceInfo};
pub use users::UserRepository;

/// Container for all repository trait objects.
///
/// Lives in `smartdict-core` so adapters can be wired without depending on
/// `smartdict-db`.
#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn UserRepository>,
    pub library: Arc<dyn LibraryRepository>,
    pub history: Arc<dyn HistoryRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Repos {
    pub fn new(
        users: Arc<dyn UserRepository>,
        library: Arc<dyn LibraryRepository>,
        history: Arc<dyn HistoryRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            users,
            library,
            history,
            settings,
        }
    }
}

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity with the same identifier already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (CLI exit codes, etc.).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    #[error(transparent)]
    Path(#[from] crate::paths::PathError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),
}
