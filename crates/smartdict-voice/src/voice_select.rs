//! Best-effort voice selection.
//!
//! Candidates are voices whose locale matches the language profile (exact
//! tag or a regional alias). Among those, the first ranked name pattern that
//! any candidate satisfies wins; otherwise the first candidate is used. No
//! candidate at all means the engine's default voice.

use smartdict_core::{LanguageProfile, VoiceInfo};

/// Pick a voice for `profile` from `catalog`. Never fails.
pub fn select_voice<'a>(profile: &LanguageProfile, catalog: &'a [VoiceInfo]) -> Option<&'a VoiceInfo> {
    let candidates: Vec<&VoiceInfo> = catalog
        .iter()
        .filter(|voice| profile.matches_locale(&voice.locale))
        .collect();

    profile
        .preferred_voices
        .iter()
        .find_map(|pattern| {
            candidates
                .iter()
                .copied()
                .find(|voice| name_matches(&voice.name, pattern))
        })
        .or_else(|| candidates.first().copied())
}

/// Every fragment of `pattern` appears in `name` (ASCII case-insensitive).
fn name_matches(name: &str, pattern: &[&str]) -> bool {
    let name = name.to_ascii_lowercase();
    pattern
        .iter()
        .all(|fragment| name.contains(&fragment.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartdict_core::Language;

    fn voice(name: &str, locale: &str) -> VoiceInfo {
        VoiceInfo::new(name, name, locale)
    }

    #[test]
    fn prefers_ranked_names_over_catalog_order() {
        let catalog = vec![
            voice("Generic HK", "zh-HK"),
            voice("Google 粵語 Cantonese", "yue-HK"),
            voice("Sin-ji", "zh_HK"),
        ];
        let chosen = select_voice(Language::Chinese.profile(), &catalog).unwrap();
        assert_eq!(chosen.name, "Sin-ji");
    }

    #[test]
    fn multi_fragment_pattern_needs_all_fragments() {
        let catalog = vec![
            voice("Google English", "yue"),
            voice("Google Cantonese", "yue"),
        ];
        let chosen = select_voice(Language::Chinese.profile(), &catalog).unwrap();
        assert_eq!(chosen.name, "Google Cantonese");
    }

    #[test]
    fn falls_back_to_first_locale_match() {
        let catalog = vec![
            voice("Samantha", "en-US"),
            voice("Serena", "en_GB"),
            voice("Kate", "en-GB"),
        ];
        let chosen = select_voice(Language::English.profile(), &catalog).unwrap();
        assert_eq!(chosen.name, "Serena");
    }

    #[test]
    fn no_locale_match_means_default_voice() {
        let catalog = vec![voice("Daniel", "en-US"), voice("Ting-Ting", "zh-CN")];
        assert!(select_voice(Language::English.profile(), &catalog).is_none());
        assert!(select_voice(Language::Chinese.profile(), &[]).is_none());
    }

    #[test]
    fn preferred_name_outside_locale_is_ignored() {
        let catalog = vec![voice("Daniel", "en-AU"), voice("Kate", "en-GB")];
        let chosen = select_voice(Language::English.profile(), &catalog).unwrap();
        assert_eq!(chosen.name, "Kate");
    }
}
