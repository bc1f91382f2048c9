//! Progress repository port - Durable per-session storage of progression counters
//!
//! Values are stored as strings under the fixed keys `level`,
//! `currentExperience` and `challengesCompleted`.

use async_trait::async_trait;

use crate::domain::value_objects::{ProgressionState, SeedValues, SessionId};

#[derive(Debug, thiserror::Error)]
pub enum ProgressRepositoryError {
    #[error("Database error: {0}")]
    Database(String),
}

#[async_trait]
pub trait ProgressRepositoryPort: Send + Sync {
    /// Read the stored keys for a session as seed values.
    ///
    /// Missing or unparsable keys come back as `None`.
    async fn load(&self, session_id: SessionId) -> Result<SeedValues, ProgressRepositoryError>;

    /// Write the full triple for a session
    async fn save(
        &self,
        session_id: SessionId,
        state: &ProgressionState,
    ) -> Result<(), ProgressRepositoryError>;
}
