//! Session recorder port — receives the history record of a finished session.

use crate::domain::HistoryRecord;

/// Fire-and-forget sink for finished-session summaries.
///
/// Called exactly once per session, on the transition to `Finished`.
/// Implementations must not block; persistence work belongs on a spawned
/// task.
pub trait SessionRecorder: Send + Sync {
    fn record(&self, record: HistoryRecord);
}

/// Recorder that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRecorder;

impl SessionRecorder for NoopRecorder {
    fn record(&self, record: HistoryRecord) {
        tracing::debug!(?record, "Session record discarded (no recorder)");
    }
}
