//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Timed dictation read-aloud for spelling and passage practice.
#[derive(Parser)]
#[command(name = "smartdict")]
#[command(about = "Read dictation sessions aloud with timed repeats")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
