//! Session loading and user resolution shared by several commands.

use anyhow::{Context, Result};
use smartdict_core::{
    CoreError, Language, Mode, RepositoryError, SessionConfig, UserProfile, items_from_lines,
    resolve_user_path,
};

use crate::bootstrap::CliContext;
use crate::commands::SessionSource;
use crate::error::CliError;

/// Build a session from a JSON file or a plain text file.
///
/// `--language` and `--mode` override what the JSON says; for text files
/// they default to English vocabulary.
pub fn load_session(source: &SessionSource) -> Result<SessionConfig> {
    let mut session = match (&source.session, &source.text) {
        (Some(path), _) => {
            let path = resolve_user_path(&path.to_string_lossy())?;
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read session file {}", path.display()))?;
            SessionConfig::from_json(&json).map_err(|e| {
                CliError::Arguments(format!("{} is not a valid session: {e}", path.display()))
            })?
        }
        (None, Some(path)) => {
            let path = resolve_user_path(&path.to_string_lossy())?;
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read text file {}", path.display()))?;
            SessionConfig::new(items_from_lines(&raw), Language::English, Mode::Vocabulary)
        }
        (None, None) => {
            return Err(CliError::Arguments(
                "give a session file, --text <file> or --library-id <id>".into(),
            )
            .into());
        }
    };

    if let Some(language) = source.language {
        session.language = language;
    }
    if let Some(mode) = source.mode {
        session.mode = mode;
    }
    Ok(session)
}

/// The user named on the command line, else the configured default.
pub async fn resolve_user(ctx: &CliContext, user: Option<&str>) -> Result<Option<UserProfile>> {
    let id = match user {
        Some(id) => Some(id.to_string()),
        None => ctx.settings.get().await?.default_user_id,
    };
    match id {
        Some(id) => {
            let profile = ctx.users.get(&id).await.map_err(|e| match e {
                CoreError::Repository(RepositoryError::NotFound(_)) => {
                    anyhow::Error::from(CliError::Arguments(format!("no user with id '{id}'")))
                }
                other => other.into(),
            })?;
            Ok(Some(profile))
        }
        None => Ok(None),
    }
}

/// Like [`resolve_user`], but a user is required.
pub async fn require_user(ctx: &CliContext, user: Option<&str>) -> Result<UserProfile> {
    resolve_user(ctx, user).await?.ok_or_else(|| {
        CliError::Arguments(
            "no user given; pass --user <id> or run 'smartdict config set default_user_id <id>'"
                .into(),
        )
        .into()
    })
}
