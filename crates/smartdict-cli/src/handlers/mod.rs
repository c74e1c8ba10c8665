//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Call the core services
//!   3. Format output for the terminal
//!
//! Handlers should NOT access repositories directly or hold business logic.

pub mod config;
pub mod history;
pub mod library;
pub mod paths;
pub mod run;
pub mod session;
pub mod users;
pub mod voices;
