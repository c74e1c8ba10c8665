//! History command handler.

use anyhow::Result;
use chrono::Local;

use super::session::require_user;
use crate::bootstrap::CliContext;
use crate::library_commands::HistoryCommand;
use crate::presentation::{format_elapsed, print_separator};
use crate::utils::input::prompt_confirmation;

pub async fn execute(ctx: &CliContext, command: HistoryCommand) -> Result<()> {
    match command {
        HistoryCommand::List { user } => list(ctx, user.as_deref()).await,
        HistoryCommand::Clear { user, force } => clear(ctx, user.as_deref(), force).await,
    }
}

async fn list(ctx: &CliContext, user: Option<&str>) -> Result<()> {
    let user = require_user(ctx, user).await?;
    let entries = ctx.history.list(&user.id).await?;

    if entries.is_empty() {
        println!("No sessions recorded for {}.", user.name);
        return Ok(());
    }

    println!(
        "{:<17} {:<8} {:<11} {:>6} {:>7}",
        "When", "Language", "Mode", "Items", "Time"
    );
    print_separator(53);
    for entry in &entries {
        println!(
            "{:<17} {:<8} {:<11} {:>6} {:>7}",
            entry
                .recorded_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            entry.language.as_str(),
            entry.mode.as_str(),
            entry.item_count,
            format_elapsed(entry.elapsed_seconds)
        );
    }
    Ok(())
}

async fn clear(ctx: &CliContext, user: Option<&str>, force: bool) -> Result<()> {
    let user = require_user(ctx, user).await?;
    if !force && !prompt_confirmation(&format!("Delete all history for {}?", user.name))? {
        println!("Cancelled.");
        return Ok(());
    }
    ctx.history.clear(&user.id).await?;
    println!("✓ History cleared for {}.", user.name);
    Ok(())
}
