//! Spoken-language profiles.
//!
//! A [`LanguageProfile`] bundles everything that varies by dictation language:
//! the voice locale to request, the phrases spoken at the start and end of a
//! session, repeat timing, and the localized instruction strings shown to the
//! learner while the sequencer runs.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Dictation language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    /// Traditional Chinese, read in Cantonese.
    Chinese,
    /// British English.
    English,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Self; 2] = [Self::Chinese, Self::English];

    /// Look up the read-only profile for this language.
    #[must_use]
    pub const fn profile(self) -> &'static LanguageProfile {
        match self {
            Self::Chinese => &CHINESE,
            Self::English => &ENGLISH,
        }
    }

    /// Stable storage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chinese => "CHINESE",
            Self::English => "ENGLISH",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chinese" | "zh" | "zh-hk" | "yue" | "cantonese" => Ok(Self::Chinese),
            "english" | "en" | "en-gb" => Ok(Self::English),
            other => Err(format!("unknown language '{other}' (expected chinese or english)")),
        }
    }
}

/// Per-language constants governing phrasing, timing, and voice targeting.
#[derive(Debug)]
pub struct LanguageProfile {
    pub language: Language,
    /// Human-readable session label.
    pub label: &'static str,
    /// Target locale requested from the speech provider (e.g. `en-GB`).
    pub voice_tag: &'static str,
    /// Locale tags treated as the same spoken language as `voice_tag`.
    pub locale_aliases: &'static [&'static str],
    /// Ranked allow-list of high-quality voice names.
    ///
    /// Each entry is a set of substrings that must all appear in the voice
    /// name; earlier entries win.
    pub preferred_voices: &'static [&'static [&'static str]],
    pub start_phrase: &'static str,
    pub end_phrase: &'static str,
    /// Times each item is read in the normal pass.
    pub vocab_repeats: u32,
    /// Gap between repeats of the same item.
    pub vocab_repeat_interval: Duration,
    /// Pause after an item's repeats complete.
    pub vocab_pause: Duration,
    ready_text: &'static str,
    review_announcement: &'static str,
    review_prefix: &'static str,
}

impl LanguageProfile {
    /// Instruction shown before the session starts.
    #[must_use]
    pub const fn ready_instruction(&self) -> &'static str {
        self.ready_text
    }

    /// Announcement spoken before the vocabulary review pass.
    #[must_use]
    pub const fn review_announcement(&self) -> &'static str {
        self.review_announcement
    }

    /// Instruction shown while an item is re-read during review.
    #[must_use]
    pub fn review_instruction(&self, text: &str) -> String {
        format!("{}: {text}", self.review_prefix)
    }

    /// Instruction for the `position`-th (1-based) vocabulary word.
    #[must_use]
    pub fn word_instruction(&self, position: usize, text: &str) -> String {
        match self.language {
            Language::Chinese => format!("第 {position} 個字: {text}"),
            Language::English => format!("Word {position}: {text}"),
        }
    }

    /// Instruction for the `position`-th (1-based) passage section.
    #[must_use]
    pub fn section_instruction(&self, position: usize, total: usize) -> String {
        match self.language {
            Language::Chinese => format!("第 {position} / {total} 段"),
            Language::English => format!("Section {position} / {total}"),
        }
    }

    /// Default library title when the user leaves it blank.
    #[must_use]
    pub const fn untitled(&self) -> &'static str {
        match self.language {
            Language::Chinese => "未命名默書",
            Language::English => "Untitled Dictation",
        }
    }

    /// Whether `tag` names the same spoken language as this profile.
    ///
    /// Comparison ignores ASCII case and treats `_` and `-` as equivalent,
    /// so `en_GB`, `en-gb` and `EN-GB` all match.
    #[must_use]
    pub fn matches_locale(&self, tag: &str) -> bool {
        let wanted = normalize_tag(tag);
        self.locale_aliases
            .iter()
            .any(|alias| normalize_tag(alias) == wanted)
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

const DEFAULT_REPEATS: u32 = 3;
const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(4000);
const DEFAULT_ITEM_PAUSE: Duration = Duration::from_millis(5000);

static CHINESE: LanguageProfile = LanguageProfile {
    language: Language::Chinese,
    label: "中文默書",
    voice_tag: "zh-HK",
    locale_aliases: &["zh-HK", "zh_HK", "yue-HK", "yue_HK", "yue"],
    preferred_voices: &[
        &["Sin-ji"],
        &["HiuGaai"],
        &["Hong Kong"],
        &["Google", "Cantonese"],
    ],
    start_phrase: "默書開始",
    end_phrase: "默書結束",
    vocab_repeats: DEFAULT_REPEATS,
    vocab_repeat_interval: DEFAULT_REPEAT_INTERVAL,
    vocab_pause: DEFAULT_ITEM_PAUSE,
    ready_text: "準備...",
    review_announcement: "現在複習所有單字",
    review_prefix: "複習",
};

static ENGLISH: LanguageProfile = LanguageProfile {
    language: Language::English,
    label: "English Dictation",
    voice_tag: "en-GB",
    locale_aliases: &["en-GB", "en_GB"],
    preferred_voices: &[&["Google UK"], &["Daniel"], &["Martha"], &["Arthur"]],
    start_phrase: "Dictation is about to begin",
    end_phrase: "End of Dictation",
    vocab_repeats: DEFAULT_REPEATS,
    vocab_repeat_interval: DEFAULT_REPEAT_INTERVAL,
    vocab_pause: DEFAULT_ITEM_PAUSE,
    ready_text: "Get Ready...",
    review_announcement: "Reviewing all words now",
    review_prefix: "Review",
};
