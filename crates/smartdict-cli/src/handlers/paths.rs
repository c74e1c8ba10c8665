//! Paths command handler.
//!
//! Displays all resolved paths for diagnostics and debugging.

use anyhow::Result;
use smartdict_core::{DATA_DIR_ENV, data_root, database_path};

/// Print resolved paths in `key = value` format.
pub fn execute() -> Result<()> {
    println!("data_root = {}", data_root()?.display());
    println!("database = {}", database_path()?.display());
    match std::env::var(DATA_DIR_ENV) {
        Ok(value) => println!("{DATA_DIR_ENV} = {value}"),
        Err(_) => println!("{DATA_DIR_ENV} = (unset)"),
    }
    Ok(())
}
