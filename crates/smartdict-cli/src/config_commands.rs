//! Configuration management subcommands.

use clap::Subcommand;

/// Settings command variants.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show all current settings
    Show,
    /// Change one setting; an empty value clears it
    Set {
        /// default_volume, vocabulary_rate, passage_rate, end_cue,
        /// speech_binary or default_user_id
        key: String,
        value: String,
    },
}
