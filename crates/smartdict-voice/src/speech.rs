//! Speech request construction and the error-swallowing `say` wrapper.

use smartdict_core::{LanguageProfile, SpeechProvider, SpeechRequest};
use tracing::{debug, warn};

use crate::voice_select::select_voice;

/// Build a request for `text`, choosing a voice from the provider's catalog
/// as it stands right now.
pub fn build_request(
    provider: &dyn SpeechProvider,
    profile: &LanguageProfile,
    text: &str,
    rate: f32,
    volume: f32,
) -> SpeechRequest {
    let catalog = provider.voices();
    let voice = select_voice(profile, &catalog).map(|v| v.id.clone());

    SpeechRequest {
        text: text.to_string(),
        language_tag: profile.voice_tag.to_string(),
        rate,
        volume,
        voice,
    }
}

/// Speak and wait. Engine errors are logged and treated as completion.
pub async fn say(provider: &dyn SpeechProvider, request: SpeechRequest) {
    debug!(
        text = %request.text,
        rate = request.rate,
        volume = request.volume,
        voice = ?request.voice,
        "Speaking"
    );
    if let Err(e) = provider.speak(request).await {
        warn!(error = %e, "Speech failed; continuing");
    }
}
