//! Application configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::outbound::NotificationPermission;

/// Where progression counters are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL
    pub database_url: String,
    /// Storage backend for progression counters
    pub storage: StorageBackend,

    /// HTTP server port
    pub server_port: u16,

    /// Challenge catalog file; the bundled catalog is used when unset
    pub challenges_path: Option<PathBuf>,

    /// Notification permission granted by the client
    pub notification_permission: NotificationPermission,
    /// Sound played when a challenge starts
    pub notification_sound: String,

    /// Live sessions and cue queues unused this long are dropped
    pub session_idle_timeout: Duration,

    /// Fixed seed for challenge draws
    pub rng_seed: Option<u64>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://moveit.db?mode=rwc".to_string()),
            storage: env::var("MOVEIT_STORAGE")
                .unwrap_or_else(|_| "sqlite".to_string())
                .parse()
                .map_err(anyhow::Error::msg)
                .context("MOVEIT_STORAGE must be 'sqlite' or 'memory'")?,

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            challenges_path: env::var("MOVEIT_CHALLENGES_PATH").ok().map(PathBuf::from),

            notification_permission: env::var("MOVEIT_NOTIFICATIONS")
                .unwrap_or_else(|_| "granted".to_string())
                .parse()
                .map_err(anyhow::Error::msg)
                .context("MOVEIT_NOTIFICATIONS must be 'granted', 'denied' or 'default'")?,
            notification_sound: env::var("MOVEIT_NOTIFICATION_SOUND")
                .unwrap_or_else(|_| "/notification.mp3".to_string()),

            session_idle_timeout: env::var("MOVEIT_SESSION_IDLE_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .map(Duration::from_secs)
                .context("MOVEIT_SESSION_IDLE_SECS must be a number of seconds")?,

            rng_seed: env::var("MOVEIT_RNG_SEED")
                .ok()
                .map(|v| v.parse())
                .transpose()
                .context("MOVEIT_RNG_SEED must be an unsigned integer")?,
        })
    }
}
