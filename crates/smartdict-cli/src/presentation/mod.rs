//! Terminal formatting for CLI output.

mod session_display;
mod tables;

pub use session_display::{format_progress, format_summary};
pub use tables::{format_elapsed, format_optional, print_separator, truncate_string};
