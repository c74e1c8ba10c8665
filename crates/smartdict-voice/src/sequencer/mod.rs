//! Playback sequencer: the timed read-aloud state machine.
//!
//! A [`PlaybackSequencer`] owns one dictation session. `start()` spawns a
//! single driver task that walks the session step by step:
//!
//! ```text
//!   start phrase → settle → item 0..N (repeats + pauses)
//!       → [vocabulary] review announcement → item 0..N once, slowly
//!       → end phrase → end cue → Finished
//! ```
//!
//! The handle stays `Send + Sync` and can be driven from any task. State is
//! published through a `watch` channel and an event stream; every suspension
//! point in the driver races the session's cancellation token, and every
//! mutation after a suspension re-checks that the session is still playing.

mod driver;
mod state;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use smartdict_core::{
    AudioCuePlayer, HistoryRecord, NoopCuePlayer, NoopRecorder, PlaybackSettings, SessionConfig,
    SessionRecorder, SpeechProvider,
};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::SequencerError;
use crate::timing::Pacer;

pub use state::{SequencerEvent, SequencerSnapshot, SequencerStatus, SessionSummary};

/// Clip handed to the cue player when no other end cue is configured.
pub const DEFAULT_END_CUE: &str = "end_cue.mp3";

/// Fixed delays and overrides of the step logic.
#[derive(Debug, Clone)]
pub struct SequencerConfig {
    /// Pause after the start phrase.
    pub settle_delay: Duration,
    /// Pause after the review announcement.
    pub review_transition_delay: Duration,
    /// Pause after each reviewed item.
    pub review_item_delay: Duration,
    /// How long the end cue plays before it is stopped.
    pub end_cue_duration: Duration,
    /// Rate used for every review read, regardless of the operator rate.
    pub review_rate: f32,
    /// Audio clip played after the end phrase.
    pub end_cue: String,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(1000),
            review_transition_delay: Duration::from_millis(2000),
            review_item_delay: Duration::from_millis(2000),
            end_cue_duration: Duration::from_millis(5000),
            review_rate: 0.3,
            end_cue: DEFAULT_END_CUE.to_string(),
        }
    }
}

impl SequencerConfig {
    #[must_use]
    pub fn with_end_cue(mut self, source: impl Into<String>) -> Self {
        self.end_cue = source.into();
        self
    }
}

/// Collaborators the sequencer drives.
#[derive(Clone)]
pub struct SequencerDeps {
    pub speech: Arc<dyn SpeechProvider>,
    pub cue: Arc<dyn AudioCuePlayer>,
    pub recorder: Arc<dyn SessionRecorder>,
}

impl SequencerDeps {
    /// Speech only; the cue player and recorder are no-ops.
    pub fn new(speech: Arc<dyn SpeechProvider>) -> Self {
        Self {
            speech,
            cue: Arc::new(NoopCuePlayer),
            recorder: Arc::new(NoopRecorder),
        }
    }

    #[must_use]
    pub fn with_cue(mut self, cue: Arc<dyn AudioCuePlayer>) -> Self {
        self.cue = cue;
        self
    }

    #[must_use]
    pub fn with_recorder(mut self, recorder: Arc<dyn SessionRecorder>) -> Self {
        self.recorder = recorder;
        self
    }
}

/// State shared between the handle and the driver task.
struct Shared {
    session: Arc<SessionConfig>,
    config: SequencerConfig,
    deps: SequencerDeps,
    state: watch::Sender<SequencerSnapshot>,
    paused: watch::Sender<bool>,
    token: CancellationToken,
    events: mpsc::UnboundedSender<SequencerEvent>,
    settings: Mutex<PlaybackSettings>,
    started_at: Mutex<Option<Instant>>,
    record: OnceLock<HistoryRecord>,
    finished: AtomicBool,
}

impl Shared {
    fn snapshot(&self) -> SequencerSnapshot {
        self.state.borrow().clone()
    }

    fn settings(&self) -> PlaybackSettings {
        *self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` only while playing, publishing the new snapshot under the
    /// same lock so events stay ordered.
    fn update_if_playing(&self, f: impl FnOnce(&mut SequencerSnapshot)) -> bool {
        self.state.send_if_modified(|s| {
            if s.status != SequencerStatus::Playing || self.token.is_cancelled() {
                return false;
            }
            f(s);
            let _ = self.events.send(SequencerEvent::StateChanged(s.clone()));
            true
        })
    }

    /// Move from one of `from` to `to`. Returns the status seen beforehand
    /// when the transition happened.
    fn transition(
        &self,
        from: &[SequencerStatus],
        to: SequencerStatus,
    ) -> Result<SequencerStatus, SequencerStatus> {
        let mut previous = to;
        let changed = self.state.send_if_modified(|s| {
            previous = s.status;
            if !from.contains(&s.status) {
                return false;
            }
            s.status = to;
            let _ = self.events.send(SequencerEvent::StateChanged(s.clone()));
            true
        });
        if changed { Ok(previous) } else { Err(previous) }
    }

    fn mark_started(&self) {
        *self
            .started_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
    }

    /// Build the history record and hand it to the recorder, once.
    fn record_history(&self) {
        let started_at = *self
            .started_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let elapsed = started_at.map_or(Duration::ZERO, |t| t.elapsed());
        let record = HistoryRecord {
            language: self.session.language,
            mode: self.session.mode,
            item_count: self.session.items.len(),
            elapsed_seconds: rounded_seconds(elapsed),
        };

        if self.record.set(record.clone()).is_ok() {
            info!(
                item_count = record.item_count,
                elapsed_seconds = record.elapsed_seconds,
                "Session finished"
            );
            self.deps.recorder.record(record);
        }
    }

    /// Send the terminal event, once.
    fn notify_finished(&self, stopped: bool) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }
        let summary = SessionSummary {
            stopped,
            record: self.record.get().cloned(),
        };
        let _ = self.events.send(SequencerEvent::Finished(summary));
    }

    /// Cancel every suspension point and silence all audio.
    fn release(&self) {
        self.token.cancel();
        self.paused.send_replace(false);
        self.deps.speech.cancel_all();
        self.deps.cue.stop();
    }
}

fn rounded_seconds(elapsed: Duration) -> u64 {
    let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    millis.saturating_add(500) / 1000
}

/// Handle to one dictation session.
///
/// Dropping the handle tears the session down: speech and audio are stopped
/// and the driver task exits at its next suspension point.
pub struct PlaybackSequencer {
    shared: Arc<Shared>,
}

impl PlaybackSequencer {
    /// Create an idle sequencer.
    ///
    /// Returns the sequencer and a receiver for [`SequencerEvent`]s.
    #[must_use]
    pub fn new(
        session: SessionConfig,
        settings: PlaybackSettings,
        config: SequencerConfig,
        deps: SequencerDeps,
    ) -> (Self, mpsc::UnboundedReceiver<SequencerEvent>) {
        let (events, event_rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(SequencerSnapshot::idle(
            session.profile().ready_instruction(),
        ));
        let (paused, _) = watch::channel(false);

        let shared = Arc::new(Shared {
            session: Arc::new(session),
            config,
            deps,
            state,
            paused,
            token: CancellationToken::new(),
            events,
            settings: Mutex::new(settings),
            started_at: Mutex::new(None),
            record: OnceLock::new(),
            finished: AtomicBool::new(false),
        });

        (Self { shared }, event_rx)
    }

    /// Current state.
    pub fn snapshot(&self) -> SequencerSnapshot {
        self.shared.snapshot()
    }

    /// Watch state changes without consuming the event stream.
    pub fn subscribe(&self) -> watch::Receiver<SequencerSnapshot> {
        self.shared.state.subscribe()
    }

    pub fn settings(&self) -> PlaybackSettings {
        self.shared.settings()
    }

    pub fn session(&self) -> &SessionConfig {
        &self.shared.session
    }

    /// Begin the session. Only valid once, from `Idle`.
    pub fn start(&self) -> Result<(), SequencerError> {
        let runtime = Handle::try_current().map_err(|_| SequencerError::NoRuntime)?;

        self.shared
            .transition(&[SequencerStatus::Idle], SequencerStatus::Playing)
            .map_err(SequencerError::NotIdle)?;

        info!(
            language = %self.shared.session.language,
            mode = %self.shared.session.mode,
            items = self.shared.session.items.len(),
            "Starting dictation"
        );

        let pacer = Pacer::new(self.shared.paused.subscribe(), self.shared.token.clone());
        let driver = driver::Driver::new(Arc::clone(&self.shared), pacer);
        runtime.spawn(driver.run());
        Ok(())
    }

    /// Suspend speech, audio and timers. No-op unless playing.
    pub fn pause(&self) {
        if self
            .shared
            .transition(&[SequencerStatus::Playing], SequencerStatus::Paused)
            .is_ok()
        {
            self.shared.paused.send_replace(true);
            self.shared.deps.speech.pause();
            self.shared.deps.cue.pause();
            debug!("Paused");
        }
    }

    /// Continue exactly where `pause` left off. No-op unless paused.
    pub fn resume(&self) {
        if self
            .shared
            .transition(&[SequencerStatus::Paused], SequencerStatus::Playing)
            .is_ok()
        {
            self.shared.deps.speech.resume();
            self.shared.deps.cue.resume();
            self.shared.paused.send_replace(false);
            debug!("Resumed");
        }
    }

    /// End the session now.
    ///
    /// In-flight speech and audio are cancelled, pending waits are cut
    /// short, and no index or repeat changes happen afterwards. A session
    /// that had started is recorded in history.
    pub fn stop(&self) {
        self.shared.release();

        let previous = match self.shared.transition(
            &[
                SequencerStatus::Idle,
                SequencerStatus::Playing,
                SequencerStatus::Paused,
            ],
            SequencerStatus::Finished,
        ) {
            Ok(previous) | Err(previous) => previous,
        };

        if previous != SequencerStatus::Idle {
            self.shared.record_history();
        }
        info!(from = ?previous, "Dictation stopped");
        self.shared.notify_finished(true);
    }

    /// Change the volume for the next utterance. A cue already playing
    /// follows immediately.
    pub fn set_volume(&self, volume: f32) {
        let volume = {
            let mut settings = self
                .shared
                .settings
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            settings.set_volume(volume);
            settings.volume()
        };
        self.shared.deps.cue.set_volume(volume);
        debug!(volume, "Volume changed");
    }

    /// Change the rate for the next utterance.
    pub fn set_rate(&self, rate: f32) {
        let mut settings = self
            .shared
            .settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        settings.set_rate(rate);
        debug!(rate = settings.rate(), "Rate changed");
    }
}

impl Drop for PlaybackSequencer {
    fn drop(&mut self) {
        self.shared.release();
    }
}
