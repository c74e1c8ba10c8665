//! Observable sequencer state.

use serde::{Deserialize, Serialize};
use smartdict_core::HistoryRecord;

/// Lifecycle of one sequencer.
///
/// ```text
///   Idle → Playing ⇄ Paused
///             │         │
///             └→ Finished ←┘   (also from Idle on stop)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SequencerStatus {
    Idle,
    Playing,
    Paused,
    /// Terminal.
    Finished,
}

/// Point-in-time view of the sequencer, published on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencerSnapshot {
    pub status: SequencerStatus,
    /// `None` until the start phrase has been read.
    pub current_index: Option<usize>,
    pub is_reviewing: bool,
    /// 1-based repeat in progress, 0 between items.
    pub current_repeat: u32,
    pub instruction: String,
}

impl SequencerSnapshot {
    pub(crate) fn idle(instruction: &str) -> Self {
        Self {
            status: SequencerStatus::Idle,
            current_index: None,
            is_reviewing: false,
            current_repeat: 0,
            instruction: instruction.to_string(),
        }
    }

    pub const fn is_finished(&self) -> bool {
        matches!(self.status, SequencerStatus::Finished)
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// `true` when the operator stopped the session.
    pub stopped: bool,
    /// The history record handed to the recorder; `None` when the session
    /// was stopped before it started.
    pub record: Option<HistoryRecord>,
}

/// Events delivered to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    StateChanged(SequencerSnapshot),
    /// Sent exactly once, last.
    Finished(SessionSummary),
}
