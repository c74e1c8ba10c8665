//! Database path resolution.

use std::path::PathBuf;

use super::error::PathError;
use super::platform::{data_root, ensure_dir};

/// Get the path to the smartdict database file.
///
/// Returns `<data root>/data/smartdict.db`, creating the `data/`
/// subdirectory if it doesn't exist.
pub fn database_path() -> Result<PathBuf, PathError> {
    let data_dir = data_root()?.join("data");
    ensure_dir(&data_dir)?;
    Ok(data_dir.join("smartdict.db"))
}
