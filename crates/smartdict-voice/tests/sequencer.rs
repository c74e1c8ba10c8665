//! Sequencer behavior under a paused tokio clock.
//!
//! Every test drives a real `PlaybackSequencer` against in-memory fakes and
//! asserts the exact schedule of speech requests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use smartdict_core::{
    AudioCuePlayer, DictationItem, HistoryRecord, Language, Mode, PlaybackSettings, SessionConfig,
    SessionRecorder, SpeechError, SpeechProvider, SpeechRequest, VoiceInfo,
};
use smartdict_voice::{
    DEFAULT_END_CUE, PlaybackSequencer, SequencerConfig, SequencerDeps, SequencerError, SequencerEvent,
    SequencerSnapshot, SequencerStatus, SessionSummary,
};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep};

// ── Fakes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Spoken {
    text: String,
    rate: f32,
    volume: f32,
    voice: Option<String>,
    at_ms: u128,
}

struct FakeSpeech {
    origin: Instant,
    utterance: Duration,
    fail: bool,
    catalog: Vec<VoiceInfo>,
    spoken: Mutex<Vec<Spoken>>,
    /// Utterances in flight stop counting down while set.
    paused: watch::Sender<bool>,
    pauses: AtomicUsize,
    resumes: AtomicUsize,
    cancels: AtomicUsize,
}

impl FakeSpeech {
    fn instant() -> Self {
        Self {
            origin: Instant::now(),
            utterance: Duration::ZERO,
            fail: false,
            catalog: Vec::new(),
            spoken: Mutex::new(Vec::new()),
            paused: watch::channel(false).0,
            pauses: AtomicUsize::new(0),
            resumes: AtomicUsize::new(0),
            cancels: AtomicUsize::new(0),
        }
    }

    fn taking(utterance: Duration) -> Self {
        Self {
            utterance,
            ..Self::instant()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::instant()
        }
    }

    fn spoken(&self) -> Vec<Spoken> {
        self.spoken.lock().unwrap().clone()
    }

    fn texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|s| s.text).collect()
    }

    fn schedule(&self) -> Vec<(String, u128)> {
        self.spoken()
            .into_iter()
            .map(|s| (s.text, s.at_ms))
            .collect()
    }
}

#[async_trait]
impl SpeechProvider for FakeSpeech {
    async fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError> {
        self.spoken.lock().unwrap().push(Spoken {
            text: request.text,
            rate: request.rate,
            volume: request.volume,
            voice: request.voice,
            at_ms: self.origin.elapsed().as_millis(),
        });
        let mut paused = self.paused.subscribe();
        let mut remaining = self.utterance;
        while !remaining.is_zero() {
            if *paused.borrow_and_update() {
                let _ = paused.changed().await;
                continue;
            }
            let started = Instant::now();
            tokio::select! {
                () = sleep(remaining) => break,
                _ = paused.changed() => remaining = remaining.saturating_sub(started.elapsed()),
            }
        }
        if self.fail {
            return Err(SpeechError::Unavailable("no engine".into()));
        }
        Ok(())
    }

    fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
        self.paused.send_replace(true);
    }

    fn resume(&self) {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        self.paused.send_replace(false);
    }

    fn cancel_all(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }

    fn voices(&self) -> Vec<VoiceInfo> {
        self.catalog.clone()
    }
}

#[derive(Default)]
struct FakeRecorder {
    records: Mutex<Vec<HistoryRecord>>,
}

impl FakeRecorder {
    fn records(&self) -> Vec<HistoryRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl SessionRecorder for FakeRecorder {
    fn record(&self, record: HistoryRecord) {
        self.records.lock().unwrap().push(record);
    }
}

struct FakeCue {
    origin: Instant,
    calls: Mutex<Vec<(String, u128)>>,
}

impl FakeCue {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn log(&self, call: String) {
        let at = self.origin.elapsed().as_millis();
        self.calls.lock().unwrap().push((call, at));
    }

    fn calls(&self) -> Vec<(String, u128)> {
        self.calls.lock().unwrap().clone()
    }
}

impl AudioCuePlayer for FakeCue {
    fn play_clip(&self, source: &str, volume: f32) {
        self.log(format!("play {source} @{volume}"));
    }

    fn set_volume(&self, volume: f32) {
        self.log(format!("volume {volume}"));
    }

    fn pause(&self) {
        self.log("pause".into());
    }

    fn resume(&self) {
        self.log("resume".into());
    }

    fn stop(&self) {
        self.log("stop".into());
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn session(words: &[&str], language: Language, mode: Mode) -> SessionConfig {
    let items = words.iter().map(|w| DictationItem::new(*w)).collect();
    SessionConfig::new(items, language, mode)
}

fn cat_dog() -> SessionConfig {
    session(&["cat", "dog"], Language::English, Mode::Vocabulary)
}

struct Harness {
    sequencer: PlaybackSequencer,
    events: mpsc::UnboundedReceiver<SequencerEvent>,
    speech: Arc<FakeSpeech>,
    recorder: Arc<FakeRecorder>,
    cue: Arc<FakeCue>,
}

impl Harness {
    fn new(session: SessionConfig, speech: FakeSpeech) -> Self {
        Self::with_config(session, speech, SequencerConfig::default())
    }

    fn with_config(session: SessionConfig, speech: FakeSpeech, config: SequencerConfig) -> Self {
        let speech = Arc::new(speech);
        let recorder = Arc::new(FakeRecorder::default());
        let cue = Arc::new(FakeCue::new());
        let deps = SequencerDeps::new(speech.clone())
            .with_recorder(recorder.clone())
            .with_cue(cue.clone());
        let settings = PlaybackSettings::for_mode(session.mode);
        let (sequencer, events) = PlaybackSequencer::new(session, settings, config, deps);
        Self {
            sequencer,
            events,
            speech,
            recorder,
            cue,
        }
    }

    /// Drain events up to and including `Finished`.
    async fn finish(&mut self) -> (Vec<SequencerSnapshot>, SessionSummary) {
        let mut states = Vec::new();
        while let Some(event) = self.events.recv().await {
            match event {
                SequencerEvent::StateChanged(s) => states.push(s),
                SequencerEvent::Finished(summary) => return (states, summary),
            }
        }
        panic!("event stream closed before Finished");
    }

    /// Events still queued without waiting.
    fn pending_events(&mut self) -> Vec<SequencerEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn vocabulary_session_follows_exact_schedule() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    h.sequencer.start().unwrap();
    let (_, summary) = h.finish().await;

    assert_eq!(
        h.speech.schedule(),
        vec![
            ("Dictation is about to begin".to_string(), 0),
            ("cat".to_string(), 1000),
            ("cat".to_string(), 5000),
            ("cat".to_string(), 9000),
            ("dog".to_string(), 14000),
            ("dog".to_string(), 18000),
            ("dog".to_string(), 22000),
            (
                Language::English.profile().review_announcement().to_string(),
                27000
            ),
            ("cat".to_string(), 29000),
            ("dog".to_string(), 31000),
            ("End of Dictation".to_string(), 33000),
        ]
    );

    let record = summary.record.expect("finished session has a record");
    assert!(!summary.stopped);
    assert_eq!(record.item_count, 2);
    assert_eq!(record.elapsed_seconds, 33);
    assert_eq!(record.mode, Mode::Vocabulary);
    assert_eq!(h.recorder.records(), vec![record]);
    assert_eq!(h.sequencer.snapshot().status, SequencerStatus::Finished);
}

#[tokio::test(start_paused = true)]
async fn review_pass_uses_slow_rate_regardless_of_operator_rate() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    h.sequencer.set_rate(1.2);
    h.sequencer.start().unwrap();
    h.finish().await;

    let spoken = h.speech.spoken();
    let review: Vec<_> = spoken[8..10].iter().map(|s| s.rate).collect();
    assert!(review.iter().all(|r| (r - 0.3).abs() < f32::EPSILON));
    assert!((spoken[1].rate - 1.2).abs() < f32::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn review_states_mark_reviewing() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    h.sequencer.start().unwrap();
    let (states, _) = h.finish().await;

    let review: Vec<_> = states
        .iter()
        .filter(|s| s.is_reviewing && s.instruction.starts_with("Review"))
        .map(|s| s.instruction.clone())
        .collect();
    assert_eq!(review, vec!["Review: cat", "Review: dog"]);

    let repeats: Vec<_> = states
        .iter()
        .filter(|s| s.current_index == Some(0) && !s.is_reviewing)
        .map(|s| s.current_repeat)
        .collect();
    assert_eq!(repeats, vec![0, 0, 1, 2, 3, 0]);
}

#[tokio::test(start_paused = true)]
async fn passage_reads_each_section_in_one_pass() {
    let mut h = Harness::new(
        session(&["First part.", "Second part."], Language::English, Mode::Passage),
        FakeSpeech::instant(),
    );
    h.sequencer.start().unwrap();
    let (states, summary) = h.finish().await;

    assert_eq!(
        h.speech.texts(),
        vec![
            "Dictation is about to begin",
            "First part.",
            "First part.",
            "First part.",
            "Second part.",
            "Second part.",
            "Second part.",
            "End of Dictation",
        ]
    );
    assert!(states.iter().all(|s| !s.is_reviewing));
    assert!(states.iter().any(|s| s.instruction == "Section 2 / 2"));
    assert_eq!(summary.record.unwrap().item_count, 2);
    // Passage default rate
    assert!((h.speech.spoken()[1].rate - 0.6).abs() < f32::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn chinese_session_uses_cantonese_phrases() {
    let mut h = Harness::new(
        session(&["貓"], Language::Chinese, Mode::Passage),
        FakeSpeech::instant(),
    );
    h.sequencer.start().unwrap();
    h.finish().await;

    let texts = h.speech.texts();
    assert_eq!(texts.first().map(String::as_str), Some("默書開始"));
    assert_eq!(texts.last().map(String::as_str), Some("默書結束"));
}

#[tokio::test(start_paused = true)]
async fn empty_session_finishes_without_items_or_review() {
    let mut h = Harness::new(
        session(&[], Language::English, Mode::Vocabulary),
        FakeSpeech::instant(),
    );
    h.sequencer.start().unwrap();
    let (states, summary) = h.finish().await;

    assert_eq!(
        h.speech.texts(),
        vec!["Dictation is about to begin", "End of Dictation"]
    );
    assert!(states.iter().all(|s| !s.is_reviewing));
    assert_eq!(summary.record.unwrap().item_count, 0);
    assert_eq!(h.recorder.records().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn empty_item_text_is_still_spoken() {
    let mut h = Harness::new(
        session(&[""], Language::English, Mode::Passage),
        FakeSpeech::instant(),
    );
    h.sequencer.start().unwrap();
    h.finish().await;

    assert_eq!(h.speech.texts().iter().filter(|t| t.is_empty()).count(), 3);
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_schedule_and_resume_continues() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    h.sequencer.start().unwrap();

    // Inside the 4 s interval after the first "cat"
    sleep(Duration::from_millis(2000)).await;
    h.sequencer.pause();
    h.sequencer.pause();
    assert_eq!(h.speech.pauses.load(Ordering::SeqCst), 1);

    sleep(Duration::from_secs(60)).await;
    let snapshot = h.sequencer.snapshot();
    assert_eq!(snapshot.status, SequencerStatus::Paused);
    assert_eq!(snapshot.current_index, Some(0));
    assert_eq!(snapshot.current_repeat, 1);
    assert_eq!(h.speech.texts().len(), 2);

    h.sequencer.resume();
    h.sequencer.resume();
    assert_eq!(h.speech.resumes.load(Ordering::SeqCst), 1);

    h.finish().await;
    let schedule = h.speech.schedule();
    // 3000 ms of the interval were left when paused at 2000 ms
    assert_eq!(schedule[2], ("cat".to_string(), 65000));
    assert_eq!(schedule.len(), 11);
}

#[tokio::test(start_paused = true)]
async fn pause_during_utterance_suspends_it_and_resume_continues() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::taking(Duration::from_millis(3000)));
    h.sequencer.start().unwrap();

    // Start phrase 0-3000, settle to 4000, first "cat" from 4000
    sleep(Duration::from_millis(4500)).await;
    h.sequencer.pause();
    h.sequencer.set_rate(1.2);
    assert_eq!(h.speech.pauses.load(Ordering::SeqCst), 1);

    sleep(Duration::from_secs(60)).await;
    let snapshot = h.sequencer.snapshot();
    assert_eq!(snapshot.status, SequencerStatus::Paused);
    assert_eq!(snapshot.current_index, Some(0));
    assert_eq!(snapshot.current_repeat, 1);
    assert_eq!(h.speech.texts(), vec!["Dictation is about to begin", "cat"]);

    h.sequencer.resume();
    h.finish().await;

    let spoken = h.speech.spoken();
    assert_eq!(
        h.speech.texts(),
        vec![
            "Dictation is about to begin",
            "cat",
            "cat",
            "cat",
            "dog",
            "dog",
            "dog",
            Language::English.profile().review_announcement(),
            "cat",
            "dog",
            "End of Dictation",
        ]
    );
    // The first "cat" finished its remaining 2500 ms after resuming at 64500
    assert_eq!(spoken[2].at_ms, 71000);
    assert_eq!(spoken[3].at_ms, 78000);
    // The rate change reached the next request only
    assert!((spoken[1].rate - 0.7).abs() < f32::EPSILON);
    assert!((spoken[2].rate - 1.2).abs() < f32::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn pause_and_resume_are_noops_in_other_states() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    h.sequencer.resume();
    h.sequencer.pause();
    assert_eq!(h.sequencer.snapshot().status, SequencerStatus::Idle);
    assert!(h.pending_events().is_empty());

    h.sequencer.start().unwrap();
    h.sequencer.resume();
    assert_eq!(h.speech.resumes.load(Ordering::SeqCst), 0);
    h.finish().await;

    h.sequencer.pause();
    assert_eq!(h.sequencer.snapshot().status, SequencerStatus::Finished);
    assert_eq!(h.speech.pauses.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn stop_mid_repeat_freezes_position() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    h.sequencer.start().unwrap();

    // Between the second and third "cat"
    sleep(Duration::from_millis(6000)).await;
    h.sequencer.stop();

    let snapshot = h.sequencer.snapshot();
    assert_eq!(snapshot.status, SequencerStatus::Finished);
    assert_eq!(snapshot.current_index, Some(0));
    assert_eq!(snapshot.current_repeat, 2);

    let (_, summary) = h.finish().await;
    assert!(summary.stopped);
    assert_eq!(summary.record.as_ref().unwrap().elapsed_seconds, 6);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(h.speech.texts().len(), 3);
    assert_eq!(h.sequencer.snapshot(), snapshot);
    assert!(h.pending_events().is_empty());
    assert_eq!(h.recorder.records().len(), 1);
    assert!(h.speech.cancels.load(Ordering::SeqCst) >= 1);
}

#[tokio::test(start_paused = true)]
async fn stop_during_utterance_cancels_it() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::taking(Duration::from_millis(3000)));
    h.sequencer.start().unwrap();

    // Start phrase 0-3000, settle to 4000, first "cat" 4000-7000
    sleep(Duration::from_millis(5000)).await;
    h.sequencer.stop();
    h.finish().await;

    sleep(Duration::from_secs(60)).await;
    assert_eq!(h.speech.texts(), vec!["Dictation is about to begin", "cat"]);
    let snapshot = h.sequencer.snapshot();
    assert_eq!(snapshot.current_index, Some(0));
    assert_eq!(snapshot.current_repeat, 1);
}

#[tokio::test(start_paused = true)]
async fn stop_while_paused_finishes_once() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    h.sequencer.start().unwrap();
    sleep(Duration::from_millis(2000)).await;
    h.sequencer.pause();
    h.sequencer.stop();
    h.sequencer.stop();

    let (_, summary) = h.finish().await;
    assert!(summary.stopped);
    sleep(Duration::from_secs(10)).await;
    assert!(h.pending_events().is_empty());
    assert_eq!(h.recorder.records().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_before_start_records_nothing() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    h.sequencer.stop();

    let (_, summary) = h.finish().await;
    assert!(summary.stopped);
    assert_eq!(summary.record, None);
    assert!(h.recorder.records().is_empty());
    assert!(h.speech.texts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn start_is_only_valid_once() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    h.sequencer.start().unwrap();
    assert_eq!(
        h.sequencer.start(),
        Err(SequencerError::NotIdle(SequencerStatus::Playing))
    );

    h.sequencer.stop();
    h.finish().await;
    assert_eq!(
        h.sequencer.start(),
        Err(SequencerError::NotIdle(SequencerStatus::Finished))
    );
}

#[test]
fn start_outside_runtime_fails() {
    let (sequencer, _events) = PlaybackSequencer::new(
        cat_dog(),
        PlaybackSettings::default(),
        SequencerConfig::default(),
        SequencerDeps::new(Arc::new(FakeSpeech::instant())),
    );
    assert_eq!(sequencer.start(), Err(SequencerError::NoRuntime));
    assert_eq!(sequencer.snapshot().status, SequencerStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn settings_change_applies_to_next_utterance() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    h.sequencer.start().unwrap();

    sleep(Duration::from_millis(2000)).await;
    h.sequencer.set_volume(0.3);
    h.sequencer.set_rate(1.1);
    h.finish().await;

    let spoken = h.speech.spoken();
    assert!((spoken[1].volume - 1.0).abs() < f32::EPSILON);
    assert!((spoken[1].rate - 0.7).abs() < f32::EPSILON);
    assert!((spoken[2].volume - 0.3).abs() < f32::EPSILON);
    assert!((spoken[2].rate - 1.1).abs() < f32::EPSILON);
    assert!(h.cue.calls().iter().any(|(call, _)| call == "volume 0.3"));
}

#[tokio::test(start_paused = true)]
async fn settings_are_clamped() {
    let h = Harness::new(cat_dog(), FakeSpeech::instant());
    h.sequencer.set_volume(3.0);
    h.sequencer.set_rate(0.0);
    let settings = h.sequencer.settings();
    assert!((settings.volume() - 1.0).abs() < f32::EPSILON);
    assert!((settings.rate() - 0.1).abs() < f32::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn speech_failures_do_not_abort_the_session() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::failing());
    h.sequencer.start().unwrap();
    let (_, summary) = h.finish().await;

    assert!(!summary.stopped);
    assert_eq!(h.speech.texts().len(), 11);
    assert_eq!(summary.record.unwrap().elapsed_seconds, 33);
}

#[tokio::test(start_paused = true)]
async fn end_cue_plays_for_five_seconds() {
    let mut h = Harness::with_config(
        cat_dog(),
        FakeSpeech::instant(),
        SequencerConfig::default().with_end_cue("chime.wav"),
    );
    let origin = Instant::now();
    h.sequencer.start().unwrap();
    h.finish().await;

    assert_eq!(origin.elapsed(), Duration::from_millis(38000));
    assert_eq!(
        h.cue.calls(),
        vec![
            ("play chime.wav @1".to_string(), 33000),
            ("stop".to_string(), 38000),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn default_end_cue_is_always_played_and_stopped() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    let origin = Instant::now();
    h.sequencer.start().unwrap();
    let (_, summary) = h.finish().await;

    assert_eq!(origin.elapsed(), Duration::from_millis(38000));
    assert_eq!(
        h.cue.calls(),
        vec![
            (format!("play {DEFAULT_END_CUE} @1"), 33000),
            ("stop".to_string(), 38000),
        ]
    );
    // Recorded when the end phrase starts, before the cue
    assert_eq!(summary.record.unwrap().elapsed_seconds, 33);
}

#[tokio::test(start_paused = true)]
async fn voice_is_chosen_from_current_catalog() {
    let speech = FakeSpeech {
        catalog: vec![
            VoiceInfo::new("fr-1", "Amelie", "fr-FR"),
            VoiceInfo::new("gb-1", "Somebody", "en_GB"),
        ],
        ..FakeSpeech::instant()
    };
    let mut h = Harness::new(session(&["cat"], Language::English, Mode::Passage), speech);
    h.sequencer.start().unwrap();
    h.finish().await;

    assert!(
        h.speech
            .spoken()
            .iter()
            .all(|s| s.voice.as_deref() == Some("gb-1"))
    );
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_tears_down() {
    let Harness {
        sequencer,
        mut events,
        speech,
        recorder,
        ..
    } = Harness::new(cat_dog(), FakeSpeech::instant());
    sequencer.start().unwrap();
    sleep(Duration::from_millis(2000)).await;

    drop(sequencer);
    assert_eq!(speech.cancels.load(Ordering::SeqCst), 1);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(speech.texts().len(), 2);
    assert!(recorder.records().is_empty());

    // Driver has exited and released the last sender
    while let Some(event) = events.recv().await {
        assert!(!matches!(event, SequencerEvent::Finished(_)));
    }
}

#[tokio::test(start_paused = true)]
async fn watch_subscribers_see_final_state() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    let mut watch = h.sequencer.subscribe();
    h.sequencer.start().unwrap();
    h.finish().await;

    watch.changed().await.unwrap();
    assert!(watch.borrow_and_update().is_finished());
}

#[tokio::test(start_paused = true)]
async fn finished_is_the_last_event() {
    let mut h = Harness::new(cat_dog(), FakeSpeech::instant());
    h.sequencer.start().unwrap();
    let (states, _) = h.finish().await;

    assert_eq!(states.first().map(|s| s.status), Some(SequencerStatus::Playing));
    assert_eq!(states.last().map(|s| s.status), Some(SequencerStatus::Finished));
    h.sequencer.stop();
    assert!(h.pending_events().is_empty());
}
