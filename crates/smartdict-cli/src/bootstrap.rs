//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where storage is wired together for the
//! CLI adapter: the SQLite pool, the repositories built over it, and the
//! services handlers call. Speech and audio adapters are built per
//! session by the `run` handler because they depend on current settings.

use anyhow::Result;
use smartdict_core::{
    HistoryService, LibraryService, Repos, SettingsService, UserService, database_path,
};
use smartdict_db::{CoreFactory, setup_database};
use tracing::debug;

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub users: UserService,
    pub library: LibraryService,
    pub history: HistoryService,
    pub settings: SettingsService,
}

/// Bootstrap the CLI application against the on-disk database.
pub async fn bootstrap() -> Result<CliContext> {
    let db_path = database_path()?;
    debug!(path = %db_path.display(), "Opening database");
    let pool = setup_database(&db_path).await?;
    Ok(bootstrap_with(CoreFactory::build_repos(pool)))
}

/// Bootstrap with custom repos (for testing).
pub fn bootstrap_with(repos: Repos) -> CliContext {
    CliContext {
        users: UserService::new(repos.users),
        library: LibraryService::new(repos.library),
        history: HistoryService::new(repos.history),
        settings: SettingsService::new(repos.settings),
    }
}
