//! Outbound ports - Interfaces that the application requires from external systems

mod notification_port;
mod progress_repository_port;

pub use notification_port::{AudioPort, NotificationPermission, NotificationPort};
pub use progress_repository_port::{ProgressRepositoryError, ProgressRepositoryPort};
