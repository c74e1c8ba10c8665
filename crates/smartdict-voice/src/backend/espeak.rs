//! eSpeak / eSpeak-NG speech provider.
//!
//! Each utterance runs one `espeak-ng` process with the text on stdin.
//! Pause and resume stop and continue that process (`SIGSTOP`/`SIGCONT` on
//! unix); `cancel_all` kills it. The voice catalog is read from
//! `espeak-ng --voices` in the background, so it may be empty for the first
//! few requests.

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use smartdict_core::{MAX_RATE, MIN_RATE, SpeechError, SpeechProvider, SpeechRequest, VoiceInfo};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::VoiceError;

/// eSpeak default speaking rate in words per minute.
const BASE_WPM: f32 = 175.0;
const MIN_WPM: f32 = 80.0;
const MAX_WPM: f32 = 450.0;

pub struct EspeakSpeechProvider {
    binary: String,
    /// Process id of the utterance in flight.
    current: Mutex<Option<u32>>,
    paused: AtomicBool,
    /// Replaced on every `cancel_all`, so later requests are unaffected.
    cancel: Mutex<CancellationToken>,
    voices: Arc<RwLock<Vec<VoiceInfo>>>,
}

impl EspeakSpeechProvider {
    /// Create a provider for `binary` (`espeak-ng` or `espeak`).
    ///
    /// When called inside a tokio runtime, voice discovery starts
    /// immediately in the background.
    pub fn new(binary: impl Into<String>) -> Self {
        let provider = Self {
            binary: binary.into(),
            current: Mutex::new(None),
            paused: AtomicBool::new(false),
            cancel: Mutex::new(CancellationToken::new()),
            voices: Arc::new(RwLock::new(Vec::new())),
        };

        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let binary = provider.binary.clone();
            let voices = Arc::clone(&provider.voices);
            runtime.spawn(async move {
                match list_voices(&binary).await {
                    Ok(found) => {
                        debug!(count = found.len(), %binary, "Voice catalog loaded");
                        *voices.write().unwrap_or_else(PoisonError::into_inner) = found;
                    }
                    Err(e) => warn!(error = %e, "Voice discovery failed; using default voice"),
                }
            });
        }

        provider
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Re-read the voice catalog and wait for the result.
    pub async fn refresh_voices(&self) -> Result<usize, VoiceError> {
        let found = list_voices(&self.binary).await?;
        let count = found.len();
        *self.voices.write().unwrap_or_else(PoisonError::into_inner) = found;
        Ok(count)
    }

    fn build_command(&self, request: &SpeechRequest) -> Command {
        let voice = request
            .voice
            .clone()
            .unwrap_or_else(|| fallback_voice(&request.language_tag));

        let mut cmd = Command::new(&self.binary);
        cmd.arg("-v")
            .arg(voice)
            .arg("-s")
            .arg(words_per_minute(request.rate).to_string())
            .arg("-a")
            .arg(amplitude(request.volume).to_string());
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }

    fn signal_current(&self, signal: ProcessSignal) {
        let pid = *self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pid) = pid {
            send_signal(pid, signal);
        }
    }
}

#[async_trait]
impl SpeechProvider for EspeakSpeechProvider {
    async fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError> {
        let token = self
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut child = self.build_command(&request).spawn().map_err(|e| {
            SpeechError::Unavailable(
                VoiceError::EngineSpawn {
                    binary: self.binary.clone(),
                    source: e,
                }
                .to_string(),
            )
        })?;
        let _current = CurrentProcess::track(&self.current, child.id());
        if self.paused.load(Ordering::SeqCst) {
            self.signal_current(ProcessSignal::Stop);
        }

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(request.text.as_bytes()).await?;
            // Dropping stdin sends EOF
            drop(stdin);
        }

        let result = tokio::select! {
            status = child.wait() => status.map_err(SpeechError::from).and_then(|status| {
                if status.success() {
                    Ok(())
                } else {
                    Err(SpeechError::Synthesis(format!("{} exited with {status}", self.binary)))
                }
            }),
            () = token.cancelled() => {
                let _ = child.kill().await;
                Ok(())
            }
        };

        result
    }

    fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
        self.signal_current(ProcessSignal::Stop);
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.signal_current(ProcessSignal::Continue);
    }

    fn cancel_all(&self) {
        let mut cancel = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
        cancel.cancel();
        *cancel = CancellationToken::new();
        self.paused.store(false, Ordering::SeqCst);
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Publishes the pid of the utterance in flight and clears it when the
/// utterance ends, including when its future is dropped mid-flight.
struct CurrentProcess<'a> {
    slot: &'a Mutex<Option<u32>>,
    pid: Option<u32>,
}

impl<'a> CurrentProcess<'a> {
    fn track(slot: &'a Mutex<Option<u32>>, pid: Option<u32>) -> Self {
        *slot.lock().unwrap_or_else(PoisonError::into_inner) = pid;
        Self { slot, pid }
    }
}

impl Drop for CurrentProcess<'_> {
    fn drop(&mut self) {
        let mut current = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        // A newer utterance may already own the slot
        if *current == self.pid {
            *current = None;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ProcessSignal {
    Stop,
    Continue,
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: ProcessSignal) {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    let sig = match signal {
        ProcessSignal::Stop => Signal::SIGSTOP,
        ProcessSignal::Continue => Signal::SIGCONT,
    };
    if let Err(e) = signal::kill(Pid::from_raw(raw), sig) {
        debug!(pid, ?sig, error = %e, "Failed to signal speech process");
    }
}

#[cfg(not(unix))]
fn send_signal(pid: u32, signal: ProcessSignal) {
    debug!(pid, ?signal, "Pausing the speech engine is not supported on this platform");
}

/// Map a rate multiplier onto eSpeak's words-per-minute range.
///
/// 1.0 is eSpeak's default speed and faster rates scale it directly. Below
/// 1.0 the range down to `MIN_RATE` is spread linearly over 80..175 wpm,
/// since eSpeak will not go slower than 80.
fn words_per_minute(rate: f32) -> u32 {
    let rate = if rate.is_finite() {
        rate.clamp(MIN_RATE, MAX_RATE)
    } else {
        1.0
    };
    let wpm = if rate < 1.0 {
        MIN_WPM + (rate - MIN_RATE) / (1.0 - MIN_RATE) * (BASE_WPM - MIN_WPM)
    } else {
        BASE_WPM * rate
    };
    let wpm = wpm.clamp(MIN_WPM, MAX_WPM).round();
    // Clamped into 80..=450 above
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let wpm = wpm as u32;
    wpm
}

/// eSpeak amplitude: 100 is normal volume.
fn amplitude(volume: f32) -> u32 {
    let amp = (volume.clamp(0.0, 1.0) * 100.0).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let amp = amp as u32;
    amp
}

/// eSpeak voice name for a locale tag when the catalog offered nothing.
fn fallback_voice(tag: &str) -> String {
    let tag = tag.trim().replace('_', "-").to_ascii_lowercase();
    match tag.as_str() {
        "zh-hk" | "yue-hk" => "yue".to_string(),
        _ => tag,
    }
}

async fn list_voices(binary: &str) -> Result<Vec<VoiceInfo>, VoiceError> {
    let output = Command::new(binary)
        .arg("--voices")
        .output()
        .await
        .map_err(|e| VoiceError::EngineSpawn {
            binary: binary.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(VoiceError::Io(std::io::Error::other(format!(
            "'{binary} --voices' exited with {}",
            output.status
        ))));
    }

    Ok(parse_voices(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `espeak-ng --voices` output.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  en-gb              --/M      English_(Great_Britain) gmw/en
///  5  yue                --/M      Chinese_(Cantonese) sit/yue
/// ```
fn parse_voices(output: &str) -> Vec<VoiceInfo> {
    output
        .lines()
        .filter(|line| !line.starts_with("Pty") && !line.trim().is_empty())
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let _priority = cols.next()?;
            let language = cols.next()?;
            let _age_gender = cols.next()?;
            let name = cols.next()?;
            Some(VoiceInfo::new(language, name.replace('_', " "), language))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 2  en-gb           --/M      English_(Great_Britain) gmw/en          (en 2)
 5  en-us           --/M      English_(America)  gmw/en-US           (en 3)
 5  yue             --/M      Chinese_(Cantonese) sit/yue            (zh-yue 5)
";

    #[test]
    fn parses_voice_table() {
        let voices = parse_voices(SAMPLE);
        assert_eq!(voices.len(), 4);
        assert_eq!(voices[1].id, "en-gb");
        assert_eq!(voices[1].name, "English (Great Britain)");
        assert_eq!(voices[3].locale, "yue");
    }

    #[test]
    fn catalog_feeds_locale_selection() {
        use smartdict_core::Language;

        let voices = parse_voices(SAMPLE);
        let zh = crate::voice_select::select_voice(Language::Chinese.profile(), &voices).unwrap();
        assert_eq!(zh.id, "yue");
        let en = crate::voice_select::select_voice(Language::English.profile(), &voices).unwrap();
        assert_eq!(en.id, "en-gb");
    }

    #[test]
    fn rate_maps_to_words_per_minute() {
        assert_eq!(words_per_minute(1.0), 175);
        assert_eq!(words_per_minute(1.5), 263);
        assert_eq!(words_per_minute(0.1), 80);
        assert_eq!(words_per_minute(9.0), 263);
        assert_eq!(words_per_minute(f32::NAN), 175);
    }

    #[test]
    fn slow_rates_stay_distinct() {
        let review = words_per_minute(0.3);
        let slow = words_per_minute(0.2);
        assert_eq!(review, 101);
        assert!(slow < review);
        assert!(review < words_per_minute(0.6));
        assert!(words_per_minute(0.6) < words_per_minute(0.7));
    }

    #[test]
    fn volume_maps_to_amplitude() {
        assert_eq!(amplitude(1.0), 100);
        assert_eq!(amplitude(0.3), 30);
        assert_eq!(amplitude(-1.0), 0);
    }

    #[test]
    fn fallback_voice_uses_cantonese_for_hong_kong() {
        assert_eq!(fallback_voice("zh-HK"), "yue");
        assert_eq!(fallback_voice("en_GB"), "en-gb");
    }

    #[test]
    fn finished_utterance_clears_current_pid() {
        let provider = EspeakSpeechProvider::new("espeak-ng");
        {
            let _tracked = CurrentProcess::track(&provider.current, Some(4242));
            assert_eq!(*provider.current.lock().unwrap(), Some(4242));
        }
        assert_eq!(*provider.current.lock().unwrap(), None);
    }

    #[test]
    fn older_utterance_does_not_clear_newer_pid() {
        let slot = Mutex::new(None);
        let older = CurrentProcess::track(&slot, Some(1));
        let _newer = CurrentProcess::track(&slot, Some(2));
        drop(older);
        assert_eq!(*slot.lock().unwrap(), Some(2));
    }

    #[test]
    fn cancel_all_forgets_current_process() {
        let provider = EspeakSpeechProvider::new("espeak-ng");
        *provider.current.lock().unwrap() = Some(4242);
        provider.cancel_all();
        assert_eq!(*provider.current.lock().unwrap(), None);
    }

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let provider = EspeakSpeechProvider::new("smartdict-no-such-espeak");
        let request = SpeechRequest {
            text: "cat".into(),
            language_tag: "en-GB".into(),
            rate: 1.0,
            volume: 1.0,
            voice: None,
        };
        assert!(matches!(
            provider.speak(request).await,
            Err(SpeechError::Unavailable(_))
        ));
    }
}
