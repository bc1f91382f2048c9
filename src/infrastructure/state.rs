//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;

use crate::application::ports::outbound::{NotificationPort, ProgressRepositoryPort};
use crate::application::services::ProgressionService;
use crate::domain::entities::ChallengeCatalog;
use crate::infrastructure::catalog::load_catalog;
use crate::infrastructure::client_cues::ClientCueOutbox;
use crate::infrastructure::config::{AppConfig, StorageBackend};
use crate::infrastructure::persistence::{InMemoryProgressRepository, SqliteProgressRepository};

/// Shared application state
pub struct AppState {
    /// Pending notifications and sounds per session
    pub client_cues: Arc<ClientCueOutbox>,
    pub progression_service: ProgressionService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let catalog = load_catalog(config.challenges_path.as_deref())
            .context("Failed to load challenge catalog")?;
        tracing::info!("  Challenges: {}", catalog.len());

        let repository: Arc<dyn ProgressRepositoryPort> = match config.storage {
            StorageBackend::Sqlite => {
                let pool = SqlitePoolOptions::new()
                    .connect(&config.database_url)
                    .await
                    .with_context(|| format!("Failed to open {}", config.database_url))?;
                Arc::new(SqliteProgressRepository::new(pool).await?)
            }
            StorageBackend::Memory => Arc::new(InMemoryProgressRepository::new()),
        };

        Ok(Self::with_parts(config, catalog, repository))
    }

    /// Assemble state from already-built collaborators
    pub fn with_parts(
        config: AppConfig,
        catalog: ChallengeCatalog,
        repository: Arc<dyn ProgressRepositoryPort>,
    ) -> Self {
        let client_cues = Arc::new(ClientCueOutbox::new(
            config.notification_permission,
            config.session_idle_timeout,
        ));
        // Asked once at startup; the answer only gates later notifications
        client_cues.request_permission();

        let progression_service = ProgressionService::new(
            Arc::new(catalog),
            repository,
            client_cues.clone(),
            client_cues.clone(),
            config.notification_sound,
            config.session_idle_timeout,
            config.rng_seed,
        );

        Self {
            client_cues,
            progression_service,
        }
    }
}
