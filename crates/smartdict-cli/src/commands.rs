//! Main commands enum and primary subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use smartdict_core::{Language, Mode};

use crate::config_commands::ConfigCommand;
use crate::library_commands::{HistoryCommand, LibraryCommand, UsersCommand};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Read a dictation session aloud
    Run(RunArgs),

    /// List the speech engine's voices
    Voices {
        /// Only show voices usable for this language
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// Show or clear a user's session history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Manage saved dictations
    Library {
        #[command(subcommand)]
        command: LibraryCommand,
    },

    /// Manage learner profiles
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },

    /// View or change application settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Show resolved data paths
    Paths,
}

/// Where a session's items come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionSource {
    /// Session file in JSON (`{"language", "mode", "items": [...]}`)
    #[arg(conflicts_with = "text")]
    pub session: Option<PathBuf>,

    /// Plain text file, one item per non-blank line
    #[arg(long)]
    pub text: Option<PathBuf>,

    /// Dictation language (overrides the session file)
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Reading mode: vocabulary or passage (overrides the session file)
    #[arg(short, long)]
    pub mode: Option<Mode>,
}

/// Arguments for `smartdict run`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub session: SessionSource,

    /// Play a saved dictation instead of a file
    #[arg(long, conflicts_with_all = ["session", "text"])]
    pub library_id: Option<i64>,

    /// User whose history records this session (defaults to the configured user)
    #[arg(short, long, env = "SMARTDICT_USER")]
    pub user: Option<String>,

    /// Starting volume, 0.0 to 1.0
    #[arg(long)]
    pub volume: Option<f32>,

    /// Starting speech rate, 0.1 to 1.5
    #[arg(long)]
    pub rate: Option<f32>,
}
