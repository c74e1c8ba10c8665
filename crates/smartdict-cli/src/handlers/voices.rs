//! Voices command handler.

use anyhow::Result;
use smartdict_core::{Language, SpeechProvider, VoiceInfo};
use smartdict_voice::{EspeakSpeechProvider, select_voice};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{print_separator, truncate_string};

/// List the engine's voices, marking the one each language would use.
pub async fn execute(ctx: &CliContext, language: Option<Language>) -> Result<()> {
    let settings = ctx.settings.get().await?;
    let provider = EspeakSpeechProvider::new(settings.effective_speech_binary());
    provider.refresh_voices().await.map_err(CliError::from)?;
    let catalog = provider.voices();

    let languages: Vec<Language> = language.map_or_else(|| Language::ALL.to_vec(), |l| vec![l]);
    for language in languages {
        let profile = language.profile();
        let usable = voices_for(language, &catalog);
        let chosen = select_voice(profile, &catalog).map(|v| v.id.as_str());

        println!("{} ({})", profile.label, profile.voice_tag);
        print_separator(60);
        if usable.is_empty() {
            println!("  no matching voice; the engine default will be used");
        }
        for voice in usable {
            let marker = if Some(voice.id.as_str()) == chosen { "*" } else { " " };
            println!(
                "{marker} {:<20} {:<30} {}",
                truncate_string(&voice.id, 20),
                truncate_string(&voice.name, 30),
                voice.locale
            );
        }
        println!();
    }
    println!("{} voices from {}", catalog.len(), provider.binary());
    Ok(())
}

fn voices_for(language: Language, catalog: &[VoiceInfo]) -> Vec<&VoiceInfo> {
    let profile = language.profile();
    catalog
        .iter()
        .filter(|v| profile.matches_locale(&v.locale))
        .collect()
}
