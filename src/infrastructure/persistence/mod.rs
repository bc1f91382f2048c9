//! Progress persistence adapters
//!
//! Both adapters store the counters as string values under fixed keys,
//! scoped by session.

mod memory_progress_repository;
mod sqlite_progress_repository;

pub use memory_progress_repository::InMemoryProgressRepository;
pub use sqlite_progress_repository::SqliteProgressRepository;
