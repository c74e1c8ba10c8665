//! Library service - saved dictation presets.

use std::sync::Arc;

use crate::domain::{NewSavedDictation, SavedDictation, SessionConfig};
use crate::ports::{CoreError, LibraryRepository};

pub struct LibraryService {
    repo: Arc<dyn LibraryRepository>,
}

impl LibraryService {
    pub fn new(repo: Arc<dyn LibraryRepository>) -> Self {
        Self { repo }
    }

    /// Save a session under `title` (blank titles get the localized default).
    pub async fn save(
        &self,
        user_id: &str,
        title: &str,
        session: &SessionConfig,
    ) -> Result<SavedDictation, CoreError> {
        if session.items.is_empty() {
            return Err(CoreError::Validation(
                "cannot save a dictation with no items".to_string(),
            ));
        }
        let preset = NewSavedDictation::new(user_id, title, session);
        Ok(self.repo.save(preset).await?)
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<SavedDictation>, CoreError> {
        Ok(self.repo.list(user_id).await?)
    }

    pub async fn get(&self, user_id: &str, id: i64) -> Result<SavedDictation, CoreError> {
        Ok(self.repo.get(user_id, id).await?)
    }

    pub async fn delete(&self, user_id: &str, id: i64) -> Result<(), CoreError> {
        Ok(self.repo.delete(user_id, id).await?)
    }
}
