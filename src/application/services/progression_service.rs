//! Progression Service - Application service owning per-session trackers
//!
//! This service keeps one `ProgressionTracker` per session and turns the
//! events of each transition into side effects:
//! - `ProgressRepositoryPort` receives the counters whenever they change
//! - `NotificationPort` and `AudioPort` announce new challenges
//!
//! Each session sits behind its own lock. A transition and the write of its
//! counters happen under that lock, so storage sees a session's states in
//! order. Storage failures are logged and never fail the operation.
//!
//! Sessions untouched for longer than the idle timeout are evicted when a
//! session is opened or resumed. Their stored counters stay.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::application::dto::{ProgressionSnapshotDto, SessionResponseDto};
use crate::application::ports::outbound::{
    AudioPort, NotificationPort, ProgressRepositoryError, ProgressRepositoryPort,
};
use crate::domain::aggregates::ProgressionTracker;
use crate::domain::entities::ChallengeCatalog;
use crate::domain::events::ProgressionEvent;
use crate::domain::value_objects::{ProgressionState, SeedValues, SessionId};

/// Title of the notification sent when a challenge starts
pub const NEW_CHALLENGE_TITLE: &str = "Novo desafio \u{1F389}";

/// Errors that can occur while driving a session's tracker
#[derive(Debug, thiserror::Error)]
pub enum ProgressionServiceError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Session already open: {0}")]
    SessionAlreadyOpen(SessionId),

    #[error("Storage error: {0}")]
    Storage(#[from] ProgressRepositoryError),
}

/// A tracker plus the time it was last used
struct LiveSession {
    tracker: ProgressionTracker,
    last_touched: Instant,
}

type SessionHandle = Arc<Mutex<LiveSession>>;

pub struct ProgressionService {
    catalog: Arc<ChallengeCatalog>,
    repository: Arc<dyn ProgressRepositoryPort>,
    notifier: Arc<dyn NotificationPort>,
    audio: Arc<dyn AudioPort>,
    notification_sound: String,
    idle_timeout: Duration,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    /// Shared by all sessions for challenge draws
    rng: std::sync::Mutex<StdRng>,
}

impl ProgressionService {
    pub fn new(
        catalog: Arc<ChallengeCatalog>,
        repository: Arc<dyn ProgressRepositoryPort>,
        notifier: Arc<dyn NotificationPort>,
        audio: Arc<dyn AudioPort>,
        notification_sound: impl Into<String>,
        idle_timeout: Duration,
        rng_seed: Option<u64>,
    ) -> Self {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            catalog,
            repository,
            notifier,
            audio,
            notification_sound: notification_sound.into(),
            idle_timeout,
            sessions: RwLock::new(HashMap::new()),
            rng: std::sync::Mutex::new(rng),
        }
    }

    pub fn catalog(&self) -> &ChallengeCatalog {
        &self.catalog
    }

    /// Start a new session from caller-supplied seeds
    #[instrument(skip(self))]
    pub async fn open_session(
        &self,
        seed: SeedValues,
    ) -> Result<SessionResponseDto, ProgressionServiceError> {
        let session_id = SessionId::new();
        let live = self
            .admit(session_id, ProgressionTracker::initialize(seed))
            .await?;
        info!(session_id = %session_id, level = live.tracker.level(), "Opened progression session");

        self.persist(session_id, &live.tracker.state()).await;
        Ok(SessionResponseDto {
            session_id,
            progress: ProgressionSnapshotDto::from(&live.tracker),
        })
    }

    /// Rebuild a closed or evicted session from its stored counters.
    ///
    /// A session that is still open is left alone and reported as
    /// `SessionAlreadyOpen`. A session with nothing stored starts from the
    /// defaults.
    #[instrument(skip(self))]
    pub async fn resume_session(
        &self,
        session_id: SessionId,
    ) -> Result<SessionResponseDto, ProgressionServiceError> {
        if self.sessions.read().await.contains_key(&session_id) {
            return Err(ProgressionServiceError::SessionAlreadyOpen(session_id));
        }

        let seed = self.repository.load(session_id).await?;
        if seed.is_empty() {
            debug!(session_id = %session_id, "No stored progress, using defaults");
        }

        let live = self
            .admit(session_id, ProgressionTracker::initialize(seed))
            .await?;
        info!(session_id = %session_id, level = live.tracker.level(), "Resumed progression session");

        self.persist(session_id, &live.tracker.state()).await;
        Ok(SessionResponseDto {
            session_id,
            progress: ProgressionSnapshotDto::from(&live.tracker),
        })
    }

    /// Drop a session's in-memory state. Stored counters are kept.
    ///
    /// Returns once any transition still running on the session has
    /// written its counters.
    #[instrument(skip(self))]
    pub async fn close_session(&self, session_id: SessionId) -> Result<(), ProgressionServiceError> {
        let handle = self
            .sessions
            .write()
            .await
            .remove(&session_id)
            .ok_or(ProgressionServiceError::SessionNotFound(session_id))?;

        drop(handle.lock().await);
        info!(session_id = %session_id, "Closed progression session");
        Ok(())
    }

    pub async fn snapshot(
        &self,
        session_id: SessionId,
    ) -> Result<ProgressionSnapshotDto, ProgressionServiceError> {
        let handle = self.handle(session_id).await?;
        let mut live = handle.lock().await;
        live.last_touched = Instant::now();
        Ok(ProgressionSnapshotDto::from(&live.tracker))
    }

    #[instrument(skip(self))]
    pub async fn start_new_challenge(
        &self,
        session_id: SessionId,
    ) -> Result<ProgressionSnapshotDto, ProgressionServiceError> {
        self.transition(session_id, |tracker, catalog, rng| {
            vec![tracker.start_new_challenge(catalog, rng)]
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn reset_challenge(
        &self,
        session_id: SessionId,
    ) -> Result<ProgressionSnapshotDto, ProgressionServiceError> {
        self.transition(session_id, |tracker, _, _| vec![tracker.reset_challenge()])
            .await
    }

    #[instrument(skip(self))]
    pub async fn completed_challenge(
        &self,
        session_id: SessionId,
    ) -> Result<ProgressionSnapshotDto, ProgressionServiceError> {
        self.transition(session_id, |tracker, _, _| tracker.completed_challenge())
            .await
    }

    #[instrument(skip(self))]
    pub async fn level_up(
        &self,
        session_id: SessionId,
    ) -> Result<ProgressionSnapshotDto, ProgressionServiceError> {
        self.transition(session_id, |tracker, _, _| vec![tracker.level_up()])
            .await
    }

    #[instrument(skip(self))]
    pub async fn close_level_up_modal(
        &self,
        session_id: SessionId,
    ) -> Result<ProgressionSnapshotDto, ProgressionServiceError> {
        self.transition(session_id, |tracker, _, _| vec![tracker.close_level_up_modal()])
            .await
    }

    /// Run one tracker transition and its side effects under the session lock
    async fn transition<F>(
        &self,
        session_id: SessionId,
        apply: F,
    ) -> Result<ProgressionSnapshotDto, ProgressionServiceError>
    where
        F: FnOnce(&mut ProgressionTracker, &ChallengeCatalog, &mut StdRng) -> Vec<ProgressionEvent>,
    {
        let handle = self.handle(session_id).await?;
        let mut guard = handle.lock().await;
        let live = &mut *guard;
        live.last_touched = Instant::now();

        let before = live.tracker.state();
        let events = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            apply(&mut live.tracker, &*self.catalog, &mut *rng)
        };
        let after = live.tracker.state();

        for event in &events {
            self.dispatch(session_id, event);
        }
        if before != after {
            self.persist(session_id, &after).await;
        }

        Ok(ProgressionSnapshotDto::from(&live.tracker))
    }

    async fn handle(&self, session_id: SessionId) -> Result<SessionHandle, ProgressionServiceError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(ProgressionServiceError::SessionNotFound(session_id))
    }

    /// Register a new live session, returning it locked
    async fn admit(
        &self,
        session_id: SessionId,
        tracker: ProgressionTracker,
    ) -> Result<OwnedMutexGuard<LiveSession>, ProgressionServiceError> {
        let handle = Arc::new(Mutex::new(LiveSession {
            tracker,
            last_touched: Instant::now(),
        }));
        let guard = handle.clone().lock_owned().await;

        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions);
        if sessions.contains_key(&session_id) {
            return Err(ProgressionServiceError::SessionAlreadyOpen(session_id));
        }
        sessions.insert(session_id, handle);

        Ok(guard)
    }

    /// Drop sessions idle past the timeout. Sessions in use are kept.
    fn evict_idle(&self, sessions: &mut HashMap<SessionId, SessionHandle>) {
        sessions.retain(|session_id, handle| match handle.try_lock() {
            Ok(live) if live.last_touched.elapsed() >= self.idle_timeout => {
                info!(session_id = %session_id, "Evicted idle progression session");
                false
            }
            _ => true,
        });
    }

    fn dispatch(&self, session_id: SessionId, event: &ProgressionEvent) {
        debug!(
            session_id = %session_id,
            event = event.name(),
            at = %event.metadata().timestamp,
            "Progression event"
        );

        match event {
            ProgressionEvent::ChallengeStarted { challenge, .. } => {
                self.audio.play(session_id, &self.notification_sound);
                self.notifier.notify(
                    session_id,
                    NEW_CHALLENGE_TITLE,
                    &format!("Valendo {}xp!", challenge.amount),
                );
            }
            ProgressionEvent::ChallengeCompleted {
                challenge, state, ..
            } => {
                info!(
                    session_id = %session_id,
                    amount = challenge.amount,
                    experience = state.current_experience,
                    completed = state.challenges_completed,
                    "Challenge completed"
                );
            }
            ProgressionEvent::LeveledUp { level, .. } => {
                info!(session_id = %session_id, level, "Level up");
            }
            ProgressionEvent::ChallengeReset { .. } | ProgressionEvent::LevelUpDismissed { .. } => {}
        }
    }

    /// Write the counters; failures are logged and dropped
    async fn persist(&self, session_id: SessionId, state: &ProgressionState) {
        if let Err(e) = self.repository.save(session_id, state).await {
            warn!(session_id = %session_id, error = %e, "Failed to persist progression");
        }
    }
}
