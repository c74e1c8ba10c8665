//! Pause-aware, cancellable delays.
//!
//! Every suspension point of the sequencer goes through a [`Pacer`]. A pacer
//! combines the session's [`CancellationToken`] with a `paused` flag:
//!
//! - [`Pacer::wait`] sleeps for a duration of *unpaused* time. While the flag
//!   is set the remaining time is frozen and the countdown resumes where it
//!   left off.
//! - [`Pacer::checkpoint`] blocks while paused.
//! - [`Pacer::guard`] races any future against cancellation.
//!
//! All three return [`Cancelled`] as soon as the token fires, so no
//! continuation runs after a stop.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// The session was stopped or torn down while suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

#[derive(Debug, Clone)]
pub struct Pacer {
    paused: watch::Receiver<bool>,
    token: CancellationToken,
}

impl Pacer {
    pub const fn new(paused: watch::Receiver<bool>, token: CancellationToken) -> Self {
        Self { paused, token }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolve once not paused. Returns immediately when already playing.
    pub async fn checkpoint(&mut self) -> Result<(), Cancelled> {
        loop {
            if self.token.is_cancelled() {
                return Err(Cancelled);
            }
            if !*self.paused.borrow_and_update() {
                return Ok(());
            }
            tokio::select! {
                biased;
                () = self.token.cancelled() => return Err(Cancelled),
                changed = self.paused.changed() => {
                    if changed.is_err() {
                        return Err(Cancelled);
                    }
                }
            }
        }
    }

    /// Sleep for `duration` of unpaused time.
    pub async fn wait(&mut self, duration: Duration) -> Result<(), Cancelled> {
        let mut remaining = duration;
        loop {
            self.checkpoint().await?;

            let started = Instant::now();
            tokio::select! {
                biased;
                () = self.token.cancelled() => return Err(Cancelled),
                () = tokio::time::sleep(remaining) => return Ok(()),
                changed = self.paused.changed() => {
                    if changed.is_err() {
                        return Err(Cancelled);
                    }
                    remaining = remaining.saturating_sub(started.elapsed());
                }
            }
        }
    }

    /// Run `fut` to completion unless the token fires first.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, Cancelled> {
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(Cancelled),
            out = fut => Ok(out),
        }
    }
}
