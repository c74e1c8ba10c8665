//! The driver task: runs one step at a time until the session ends.

use std::sync::Arc;

use smartdict_core::{DictationItem, LanguageProfile, Mode};
use tracing::{debug, info};

use super::{SequencerSnapshot, SequencerStatus, Shared};
use crate::speech;
use crate::timing::{Cancelled, Pacer};

pub(super) struct Driver {
    shared: Arc<Shared>,
    pacer: Pacer,
}

impl Driver {
    pub(super) const fn new(shared: Arc<Shared>, pacer: Pacer) -> Self {
        Self { shared, pacer }
    }

    pub(super) async fn run(mut self) {
        if self.drive().await == Err(Cancelled) {
            debug!("Driver exited after cancellation");
        }
    }

    fn profile(&self) -> &'static LanguageProfile {
        self.shared.session.profile()
    }

    async fn drive(&mut self) -> Result<(), Cancelled> {
        let session = Arc::clone(&self.shared.session);
        let total = session.items.len();

        loop {
            self.pacer.checkpoint().await?;
            let snapshot = self.shared.snapshot();

            match snapshot.current_index {
                None => self.start_phase().await?,
                Some(index) if index >= total => {
                    if session.mode == Mode::Vocabulary && total > 0 && !snapshot.is_reviewing {
                        self.review_transition().await?;
                    } else {
                        return self.finish_phase().await;
                    }
                }
                Some(index) => {
                    let item = &session.items[index];
                    if snapshot.is_reviewing {
                        self.review_item(index, item).await?;
                    } else {
                        self.read_item(index, item, session.mode, total).await?;
                    }
                }
            }
        }
    }

    async fn start_phase(&mut self) -> Result<(), Cancelled> {
        let start = self.profile().start_phrase;
        self.commit(|s| s.instruction = start.to_string()).await?;
        self.shared.mark_started();

        let rate = self.shared.settings().rate();
        self.speak(start, rate).await?;
        self.pacer.wait(self.shared.config.settle_delay).await?;
        self.commit(|s| s.current_index = Some(0)).await
    }

    async fn review_transition(&mut self) -> Result<(), Cancelled> {
        let announcement = self.profile().review_announcement();
        info!("Starting review pass");
        self.commit(|s| s.instruction = announcement.to_string())
            .await?;

        let rate = self.shared.settings().rate();
        self.speak(announcement, rate).await?;
        self.pacer
            .wait(self.shared.config.review_transition_delay)
            .await?;
        self.commit(|s| {
            s.is_reviewing = true;
            s.current_index = Some(0);
        })
        .await
    }

    async fn review_item(&mut self, index: usize, item: &DictationItem) -> Result<(), Cancelled> {
        let instruction = self.profile().review_instruction(&item.display_text);
        self.commit(|s| s.instruction.clone_from(&instruction))
            .await?;

        self.speak(item.text_to_speak(), self.shared.config.review_rate)
            .await?;
        self.pacer.wait(self.shared.config.review_item_delay).await?;
        self.commit(|s| s.current_index = Some(index + 1)).await
    }

    async fn read_item(
        &mut self,
        index: usize,
        item: &DictationItem,
        mode: Mode,
        total: usize,
    ) -> Result<(), Cancelled> {
        let profile = self.profile();
        let instruction = match mode {
            Mode::Vocabulary => profile.word_instruction(index + 1, &item.display_text),
            Mode::Passage => profile.section_instruction(index + 1, total),
        };
        self.commit(|s| s.instruction.clone_from(&instruction))
            .await?;

        let repeats = profile.vocab_repeats;
        for repeat in 1..=repeats {
            // Waits out a pause here rather than skipping the repeat
            self.commit(|s| s.current_repeat = repeat).await?;

            let rate = self.shared.settings().rate();
            self.speak(item.text_to_speak(), rate).await?;

            if repeat < repeats {
                self.pacer.wait(profile.vocab_repeat_interval).await?;
            }
        }

        self.commit(|s| s.current_repeat = 0).await?;
        self.pacer.wait(profile.vocab_pause).await?;
        self.commit(|s| s.current_index = Some(index + 1)).await
    }

    async fn finish_phase(&mut self) -> Result<(), Cancelled> {
        let end = self.profile().end_phrase;
        self.commit(|s| {
            s.status = SequencerStatus::Finished;
            s.instruction = end.to_string();
        })
        .await?;
        self.shared.record_history();

        let settings = self.shared.settings();
        self.speak(end, settings.rate()).await?;

        let volume = self.shared.settings().volume();
        self.shared
            .deps
            .cue
            .play_clip(&self.shared.config.end_cue, volume);
        let waited = self.pacer.wait(self.shared.config.end_cue_duration).await;
        self.shared.deps.cue.stop();
        waited?;

        self.shared.notify_finished(false);
        Ok(())
    }

    /// Apply a state change once the session is playing.
    ///
    /// Blocks through a pause and fails with [`Cancelled`] after a stop, so a
    /// suspension that resolves late can never move the index.
    async fn commit(&mut self, f: impl Fn(&mut SequencerSnapshot)) -> Result<(), Cancelled> {
        loop {
            self.pacer.checkpoint().await?;
            if self.shared.update_if_playing(&f) {
                return Ok(());
            }
            if self.pacer.is_cancelled() || self.shared.snapshot().is_finished() {
                return Err(Cancelled);
            }
            // Paused between the checkpoint and the update
            tokio::task::yield_now().await;
        }
    }

    async fn speak(&mut self, text: &str, rate: f32) -> Result<(), Cancelled> {
        self.pacer.checkpoint().await?;

        let provider = Arc::clone(&self.shared.deps.speech);
        let volume = self.shared.settings().volume();
        let request = speech::build_request(provider.as_ref(), self.profile(), text, rate, volume);
        self.pacer.guard(speech::say(provider.as_ref(), request)).await
    }
}
