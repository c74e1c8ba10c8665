//! Library, history and user subcommands.

use clap::Subcommand;

use crate::commands::SessionSource;

/// Saved dictation commands.
#[derive(Subcommand)]
pub enum LibraryCommand {
    /// List a user's saved dictations, newest first
    List {
        #[arg(short, long, env = "SMARTDICT_USER")]
        user: Option<String>,
    },
    /// Save a session to the library
    Save {
        #[command(flatten)]
        session: SessionSource,
        /// Title (defaults to "Untitled Dictation")
        #[arg(short, long, default_value = "")]
        title: String,
        #[arg(short, long, env = "SMARTDICT_USER")]
        user: Option<String>,
    },
    /// Delete a saved dictation
    Delete {
        id: i64,
        #[arg(short, long, env = "SMARTDICT_USER")]
        user: Option<String>,
    },
}

/// History commands.
#[derive(Subcommand)]
pub enum HistoryCommand {
    /// Show recent sessions, newest first
    List {
        #[arg(short, long, env = "SMARTDICT_USER")]
        user: Option<String>,
    },
    /// Delete all history for a user
    Clear {
        #[arg(short, long, env = "SMARTDICT_USER")]
        user: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Learner profile commands.
#[derive(Subcommand)]
pub enum UsersCommand {
    /// List profiles
    List,
    /// Create a profile
    Add {
        name: String,
        /// Emoji avatar (defaults to 🐻)
        #[arg(short, long, default_value = "")]
        avatar: String,
        /// Make this the default user for new sessions
        #[arg(long)]
        default: bool,
    },
    /// Delete a profile with its library and history
    Remove {
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
