//! Library command handler.

use anyhow::Result;

use super::session::{load_session, require_user};
use crate::bootstrap::CliContext;
use crate::library_commands::LibraryCommand;
use crate::presentation::{print_separator, truncate_string};

pub async fn execute(ctx: &CliContext, command: LibraryCommand) -> Result<()> {
    match command {
        LibraryCommand::List { user } => {
            let user = require_user(ctx, user.as_deref()).await?;
            let saved = ctx.library.list(&user.id).await?;
            if saved.is_empty() {
                println!("No saved dictations for {}.", user.name);
                return Ok(());
            }
            println!(
                "{:<5} {:<30} {:<8} {:<11} {:>5}",
                "ID", "Title", "Language", "Mode", "Items"
            );
            print_separator(63);
            for preset in saved {
                println!(
                    "{:<5} {:<30} {:<8} {:<11} {:>5}",
                    preset.id,
                    truncate_string(&preset.title, 30),
                    preset.language.as_str(),
                    preset.mode.as_str(),
                    preset.items.len()
                );
            }
        }
        LibraryCommand::Save {
            session,
            title,
            user,
        } => {
            let user = require_user(ctx, user.as_deref()).await?;
            let session = load_session(&session)?;
            let saved = ctx.library.save(&user.id, &title, &session).await?;
            println!(
                "✓ Saved \"{}\" ({} items) as ID {}",
                saved.title,
                saved.items.len(),
                saved.id
            );
        }
        LibraryCommand::Delete { id, user } => {
            let user = require_user(ctx, user.as_deref()).await?;
            ctx.library.delete(&user.id, id).await?;
            println!("✓ Deleted saved dictation {id}.");
        }
    }
    Ok(())
}
