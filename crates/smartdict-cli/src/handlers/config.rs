//! Config command handler.

use anyhow::Result;
use smartdict_core::{Settings, parse_update};

use crate::bootstrap::CliContext;
use crate::config_commands::ConfigCommand;
use crate::error::CliError;
use crate::presentation::format_optional;

pub async fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let settings = ctx.settings.get().await?;
            print!("{}", render(&settings));
        }
        ConfigCommand::Set { key, value } => {
            let settings = set(ctx, &key, &value).await?;
            println!("✓ Updated {key}.");
            print!("{}", render(&settings));
        }
    }
    Ok(())
}

/// Apply one `key = value` change.
pub async fn set(ctx: &CliContext, key: &str, value: &str) -> Result<Settings> {
    let update = parse_update(key, value).map_err(|e| CliError::Config(e.to_string()))?;
    Ok(ctx.settings.update(update).await?)
}

fn render(settings: &Settings) -> String {
    let defaults = Settings::with_defaults();
    let unset = "(unset)";
    let rows = [
        (
            "default_volume",
            format_optional(settings.default_volume.or(defaults.default_volume).as_ref(), unset),
        ),
        (
            "vocabulary_rate",
            format_optional(settings.vocabulary_rate.or(defaults.vocabulary_rate).as_ref(), unset),
        ),
        (
            "passage_rate",
            format_optional(settings.passage_rate.or(defaults.passage_rate).as_ref(), unset),
        ),
        ("end_cue", format_optional(settings.end_cue.as_ref(), unset)),
        (
            "speech_binary",
            settings.effective_speech_binary().to_string(),
        ),
        (
            "default_user_id",
            format_optional(settings.default_user_id.as_ref(), unset),
        ),
    ];
    rows.iter()
        .map(|(key, value)| format!("{key} = {value}\n"))
        .collect()
}
