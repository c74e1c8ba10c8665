#![doc = include_str!("../README.md")]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    DictationItem, HISTORY_LIMIT, HistoryEntry, HistoryRecord, Language, LanguageProfile,
    MAX_RATE, MIN_RATE, Mode, NewSavedDictation, NewUser, PlaybackSettings, SavedDictation,
    SessionConfig, UserProfile, items_from_lines,
};
pub use ports::{
    AudioCuePlayer, CoreError, HistoryRepository, LibraryRepository, NoopCuePlayer, NoopRecorder,
    Repos, RepositoryError, SessionRecorder, SettingsRepository, SpeechError, SpeechProvider,
    SpeechRequest, UserRepository, VoiceInfo,
};
pub use services::{
    AVATAR_PRESETS, HistoryRecorder, HistoryService, LibraryService, SettingsService, UserService,
};
pub use settings::{
    DEFAULT_SPEECH_BINARY, Settings, SettingsError, SettingsUpdate, parse_update,
    validate_settings,
};

// Re-export path utilities
pub use paths::{DATA_DIR_ENV, PathError, data_root, database_path, resolve_user_path};
