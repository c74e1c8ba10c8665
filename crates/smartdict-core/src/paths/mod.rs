//! Path utilities for smartdict data directories.
//!
//! - Database location
//! - Application data root
//! - User-supplied file paths (end cue audio, word lists)
//!
//! Returns `PathBuf` and `PathError`; no terminal I/O happens here.

mod database;
mod error;
mod platform;

#[cfg(test)]
mod test_utils;

pub use database::database_path;
pub use error::PathError;
pub use platform::{DATA_DIR_ENV, data_root, resolve_user_path};
