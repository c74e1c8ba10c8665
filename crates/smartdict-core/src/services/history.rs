//! Session history: persistence of finished-session summaries.
//!
//! [`HistoryRecorder`] is the bridge between the sequencer, which hands over
//! a record synchronously on its terminal transition, and the async
//! [`HistoryRepository`]. Each record is written on a spawned task so the
//! sequencer never waits on storage.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::{HISTORY_LIMIT, HistoryEntry, HistoryRecord};
use crate::ports::{CoreError, HistoryRepository, SessionRecorder};

/// Service for reading and clearing a user's session history.
#[derive(Clone)]
pub struct HistoryService {
    repo: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    pub fn new(repo: Arc<dyn HistoryRepository>) -> Self {
        Self { repo }
    }

    /// Entries for a user, newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<HistoryEntry>, CoreError> {
        Ok(self.repo.list(user_id).await?)
    }

    pub async fn clear(&self, user_id: &str) -> Result<(), CoreError> {
        Ok(self.repo.clear(user_id).await?)
    }

    /// Build a [`SessionRecorder`] that files records under `user_id`.
    pub fn recorder_for(&self, user_id: impl Into<String>) -> HistoryRecorder {
        HistoryRecorder {
            repo: Arc::clone(&self.repo),
            user_id: user_id.into(),
            pending: Mutex::new(Vec::new()),
        }
    }
}

/// Records finished sessions for one user.
pub struct HistoryRecorder {
    repo: Arc<dyn HistoryRepository>,
    user_id: String,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl HistoryRecorder {
    /// Wait for every write started so far.
    pub async fn flush(&self) {
        let handles: Vec<_> = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "History write task failed");
            }
        }
    }
}

impl SessionRecorder for HistoryRecorder {
    fn record(&self, record: HistoryRecord) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(user_id = %self.user_id, "No async runtime; history record dropped");
            return;
        };

        let repo = Arc::clone(&self.repo);
        let user_id = self.user_id.clone();
        let handle = runtime.spawn(async move {
            match repo.insert(&user_id, &record, HISTORY_LIMIT).await {
                Ok(id) => debug!(id, %user_id, "Session recorded"),
                Err(e) => warn!(error = %e, %user_id, "Failed to record session"),
            }
        });

        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }
}
