//! Users command handler.

use anyhow::Result;
use smartdict_core::{NewUser, SettingsUpdate, UserProfile};

use crate::bootstrap::CliContext;
use crate::library_commands::UsersCommand;
use crate::presentation::print_separator;
use crate::utils::input::prompt_confirmation;

pub async fn execute(ctx: &CliContext, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List => {
            let users = ctx.users.list().await?;
            let default = ctx.settings.get().await?.default_user_id;
            if users.is_empty() {
                println!("No users yet. Create one with 'smartdict users add <name>'.");
                return Ok(());
            }
            println!("  {:<38} {:<6} Name", "ID", "Avatar");
            print_separator(60);
            for user in users {
                let marker = if default.as_deref() == Some(user.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {:<38} {:<6} {}", user.id, user.avatar, user.name);
            }
        }
        UsersCommand::Add {
            name,
            avatar,
            default,
        } => {
            let user = add(ctx, &name, avatar, default).await?;
            println!("✓ Created {} {} (ID: {})", user.avatar, user.name, user.id);
        }
        UsersCommand::Remove { id, force } => {
            let user = ctx.users.get(&id).await?;
            if !force
                && !prompt_confirmation(&format!(
                    "Delete {} with all saved dictations and history?",
                    user.name
                ))?
            {
                println!("Cancelled.");
                return Ok(());
            }
            remove(ctx, &id).await?;
            println!("✓ Deleted {}.", user.name);
        }
    }
    Ok(())
}

/// Create a user, optionally making them the default.
pub async fn add(
    ctx: &CliContext,
    name: &str,
    avatar: String,
    make_default: bool,
) -> Result<UserProfile> {
    let user = ctx
        .users
        .create(NewUser {
            name: name.to_string(),
            avatar,
            is_custom: false,
        })
        .await?;

    if make_default {
        ctx.settings
            .update(SettingsUpdate {
                default_user_id: Some(Some(user.id.clone())),
                ..Default::default()
            })
            .await?;
    }
    Ok(user)
}

/// Delete a user and clear the default if it pointed at them.
pub async fn remove(ctx: &CliContext, id: &str) -> Result<()> {
    ctx.users.delete(id).await?;
    if ctx.settings.get().await?.default_user_id.as_deref() == Some(id) {
        ctx.settings
            .update(SettingsUpdate {
                default_user_id: Some(None),
                ..Default::default()
            })
            .await?;
    }
    Ok(())
}
