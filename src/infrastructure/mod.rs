//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite and in-memory progress storage
//! - HTTP: REST API routes
//! - Catalog: Challenge catalog loading
//! - Client cues: Notification and sound outbox
//! - Config: Application configuration
//! - State: Shared application state

pub mod catalog;
pub mod client_cues;
pub mod config;
pub mod http;
pub mod persistence;
pub mod state;
