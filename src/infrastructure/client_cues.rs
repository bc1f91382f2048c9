//! Client cue outbox
//!
//! The engine cannot show a browser notification or play a sound itself.
//! Instead it queues cues per session and the client drains them over HTTP
//! and presents them.
//!
//! Queues nobody has touched within the retention window are dropped the
//! next time a session gets its first cue.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::ports::outbound::{AudioPort, NotificationPermission, NotificationPort};
use crate::domain::value_objects::SessionId;

/// Oldest cues are dropped past this many per session
const MAX_CUES_PER_SESSION: usize = 32;

/// Something the client should present
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCue {
    Notification {
        title: String,
        body: String,
        created_at: DateTime<Utc>,
    },
    Sound {
        clip: String,
        created_at: DateTime<Utc>,
    },
}

#[derive(Default)]
struct CueQueue {
    cues: VecDeque<ClientCue>,
    touched: Option<Instant>,
}

pub struct ClientCueOutbox {
    /// What the client reports it allows
    configured: NotificationPermission,
    /// What has been requested so far
    permission: Mutex<NotificationPermission>,
    retention: Duration,
    queues: Mutex<HashMap<SessionId, CueQueue>>,
}

impl ClientCueOutbox {
    pub fn new(configured: NotificationPermission, retention: Duration) -> Self {
        Self {
            configured,
            permission: Mutex::new(NotificationPermission::Default),
            retention,
            queues: Mutex::new(HashMap::new()),
        }
    }

    /// Take every queued cue for a session, oldest first
    pub fn drain(&self, session_id: SessionId) -> Vec<ClientCue> {
        self.queues()
            .remove(&session_id)
            .map(|queue| Vec::from(queue.cues))
            .unwrap_or_default()
    }

    /// Forget a session's pending cues
    pub fn discard(&self, session_id: SessionId) {
        self.queues().remove(&session_id);
    }

    fn push(&self, session_id: SessionId, cue: ClientCue) {
        let mut queues = self.queues();
        if !queues.contains_key(&session_id) {
            let retention = self.retention;
            queues.retain(|_, queue| queue.touched.is_some_and(|at| at.elapsed() < retention));
        }

        let queue = queues.entry(session_id).or_default();
        if queue.cues.len() == MAX_CUES_PER_SESSION {
            queue.cues.pop_front();
        }
        queue.cues.push_back(cue);
        queue.touched = Some(Instant::now());
    }

    // Queues are never left half-written, so a poisoned lock is still usable
    fn queues(&self) -> MutexGuard<'_, HashMap<SessionId, CueQueue>> {
        self.queues.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl NotificationPort for ClientCueOutbox {
    fn request_permission(&self) -> NotificationPermission {
        let mut permission = self.permission.lock().unwrap_or_else(|e| e.into_inner());
        if *permission == NotificationPermission::Default {
            *permission = self.configured;
            tracing::info!(permission = ?self.configured, "Notification permission resolved");
        }
        *permission
    }

    fn permission(&self) -> NotificationPermission {
        *self.permission.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(&self, session_id: SessionId, title: &str, body: &str) {
        if self.permission() != NotificationPermission::Granted {
            tracing::debug!(session_id = %session_id, "Notification dropped, permission not granted");
            return;
        }
        self.push(
            session_id,
            ClientCue::Notification {
                title: title.to_string(),
                body: body.to_string(),
                created_at: Utc::now(),
            },
        );
    }
}

impl AudioPort for ClientCueOutbox {
    fn play(&self, session_id: SessionId, clip: &str) {
        self.push(
            session_id,
            ClientCue::Sound {
                clip: clip.to_string(),
                created_at: Utc::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_notifications_require_granted_permission() {
        let outbox = ClientCueOutbox::new(NotificationPermission::Granted, HOUR);
        let session_id = SessionId::new();

        // Not requested yet
        outbox.notify(session_id, "Title", "Body");
        assert!(outbox.drain(session_id).is_empty());

        assert_eq!(outbox.request_permission(), NotificationPermission::Granted);
        outbox.notify(session_id, "Title", "Body");

        let cues = outbox.drain(session_id);
        assert_eq!(cues.len(), 1);
        assert!(matches!(&cues[0], ClientCue::Notification { title, .. } if title == "Title"));
    }

    #[test]
    fn test_denied_permission_still_plays_sound() {
        let outbox = ClientCueOutbox::new(NotificationPermission::Denied, HOUR);
        let session_id = SessionId::new();
        assert_eq!(outbox.request_permission(), NotificationPermission::Denied);

        outbox.notify(session_id, "Novo desafio", "Valendo 80xp!");
        outbox.play(session_id, "/notification.mp3");

        let cues = outbox.drain(session_id);
        assert_eq!(cues.len(), 1);
        assert!(matches!(&cues[0], ClientCue::Sound { clip, .. } if clip == "/notification.mp3"));
    }

    #[test]
    fn test_drain_empties_queue_and_is_per_session() {
        let outbox = ClientCueOutbox::new(NotificationPermission::Granted, HOUR);
        let first = SessionId::new();
        let second = SessionId::new();

        outbox.play(first, "a.mp3");
        outbox.play(second, "b.mp3");

        assert_eq!(outbox.drain(first).len(), 1);
        assert!(outbox.drain(first).is_empty());
        assert_eq!(outbox.drain(second).len(), 1);
    }

    #[test]
    fn test_queue_is_bounded() {
        let outbox = ClientCueOutbox::new(NotificationPermission::Granted, HOUR);
        let session_id = SessionId::new();

        for i in 0..(MAX_CUES_PER_SESSION + 5) {
            outbox.play(session_id, &format!("{}.mp3", i));
        }

        let cues = outbox.drain(session_id);
        assert_eq!(cues.len(), MAX_CUES_PER_SESSION);
        assert!(matches!(&cues[0], ClientCue::Sound { clip, .. } if clip == "5.mp3"));
    }

    #[test]
    fn test_stale_queues_are_dropped() {
        let outbox = ClientCueOutbox::new(NotificationPermission::Granted, Duration::ZERO);
        let abandoned = SessionId::new();
        let active = SessionId::new();

        outbox.play(abandoned, "a.mp3");
        outbox.play(active, "b.mp3");

        assert!(outbox.drain(abandoned).is_empty());
        assert_eq!(outbox.drain(active).len(), 1);
    }

    #[test]
    fn test_recent_queues_are_kept() {
        let outbox = ClientCueOutbox::new(NotificationPermission::Granted, HOUR);
        let first = SessionId::new();
        let second = SessionId::new();

        outbox.play(first, "a.mp3");
        outbox.play(second, "b.mp3");

        assert_eq!(outbox.drain(first).len(), 1);
        assert_eq!(outbox.drain(second).len(), 1);
    }
}
