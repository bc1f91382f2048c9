use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{ProgressRepositoryError, ProgressRepositoryPort};
use crate::domain::value_objects::{ProgressionState, SeedValues, SessionId};

/// Keeps progress for the lifetime of the process
#[derive(Default)]
pub struct InMemoryProgressRepository {
    entries: RwLock<HashMap<SessionId, HashMap<String, String>>>,
}

impl InMemoryProgressRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepositoryPort for InMemoryProgressRepository {
    async fn load(&self, session_id: SessionId) -> Result<SeedValues, ProgressRepositoryError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&session_id)
            .map(|pairs| SeedValues::from_persisted(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))))
            .unwrap_or_default())
    }

    async fn save(
        &self,
        session_id: SessionId,
        state: &ProgressionState,
    ) -> Result<(), ProgressRepositoryError> {
        let mut entries = self.entries.write().await;
        let pairs = entries.entry(session_id).or_default();
        for (key, value) in state.persisted_pairs() {
            pairs.insert(key.to_string(), value);
        }
        Ok(())
    }
}
