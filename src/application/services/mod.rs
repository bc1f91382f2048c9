//! Application services - Use case implementations
//!
//! Services accept port dependencies and return domain entities or DTOs.

pub mod progression_service;

pub use progression_service::{ProgressionService, ProgressionServiceError};
