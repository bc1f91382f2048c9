use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::application::ports::outbound::{ProgressRepositoryError, ProgressRepositoryPort};
use crate::domain::value_objects::{ProgressionState, SeedValues, SessionId};

pub struct SqliteProgressRepository {
    pool: SqlitePool,
}

impl SqliteProgressRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        // Create table if not exists
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS progress (
                session_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (session_id, key)
            )
        "#).execute(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl ProgressRepositoryPort for SqliteProgressRepository {
    async fn load(&self, session_id: SessionId) -> Result<SeedValues, ProgressRepositoryError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT key, value FROM progress WHERE session_id = ?")
                .bind(session_id.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| ProgressRepositoryError::Database(e.to_string()))?;

        Ok(SeedValues::from_persisted(
            rows.iter().map(|(key, value)| (key.as_str(), value.as_str())),
        ))
    }

    async fn save(
        &self,
        session_id: SessionId,
        state: &ProgressionState,
    ) -> Result<(), ProgressRepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ProgressRepositoryError::Database(e.to_string()))?;

        for (key, value) in state.persisted_pairs() {
            sqlx::query("INSERT OR REPLACE INTO progress (session_id, key, value, updated_at) VALUES (?, ?, ?, CURRENT_TIMESTAMP)")
                .bind(session_id.to_string())
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await
                .map_err(|e| ProgressRepositoryError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| ProgressRepositoryError::Database(e.to_string()))
    }
}
