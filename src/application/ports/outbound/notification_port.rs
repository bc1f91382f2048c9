//! Notification and audio ports - Fire-and-forget client side effects

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::SessionId;

/// Whether the client allows notifications to be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPermission {
    /// Not asked yet
    #[default]
    Default,
    Granted,
    Denied,
}

impl std::str::FromStr for NotificationPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            other => Err(format!("unknown notification permission: {}", other)),
        }
    }
}

pub trait NotificationPort: Send + Sync {
    /// Ask once for permission. Callers do not wait on the answer.
    fn request_permission(&self) -> NotificationPermission;

    fn permission(&self) -> NotificationPermission;

    /// Show a notification. No-op unless permission is granted.
    fn notify(&self, session_id: SessionId, title: &str, body: &str);
}

pub trait AudioPort: Send + Sync {
    /// Play a short clip. Nothing is reported back.
    fn play(&self, session_id: SessionId, clip: &str);
}
