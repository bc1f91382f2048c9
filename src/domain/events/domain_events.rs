//! Domain events - Notifications of significant state changes
//!
//! The progression tracker reports what happened through these events and
//! leaves side effects (storage, notifications, sound) to its owner.

use chrono::{DateTime, Utc};

use crate::domain::entities::Challenge;
use crate::domain::value_objects::ProgressionState;

/// Base data for all events
#[derive(Debug, Clone, PartialEq)]
pub struct EventMetadata {
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
        }
    }
}

/// All progression events in the system
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressionEvent {
    /// A challenge became active, possibly replacing another one
    ChallengeStarted {
        metadata: EventMetadata,
        challenge: Challenge,
        replaced: Option<Challenge>,
    },

    /// The active challenge was abandoned
    ChallengeReset {
        metadata: EventMetadata,
        abandoned: Option<Challenge>,
    },

    /// The active challenge was completed and its reward credited
    ChallengeCompleted {
        metadata: EventMetadata,
        challenge: Challenge,
        state: ProgressionState,
    },

    /// The user reached a new level
    LeveledUp {
        metadata: EventMetadata,
        level: u32,
    },

    /// The level-up announcement was dismissed
    LevelUpDismissed { metadata: EventMetadata },
}

impl ProgressionEvent {
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            Self::ChallengeStarted { metadata, .. }
            | Self::ChallengeReset { metadata, .. }
            | Self::ChallengeCompleted { metadata, .. }
            | Self::LeveledUp { metadata, .. }
            | Self::LevelUpDismissed { metadata } => metadata,
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChallengeStarted { .. } => "challenge_started",
            Self::ChallengeReset { .. } => "challenge_reset",
            Self::ChallengeCompleted { .. } => "challenge_completed",
            Self::LeveledUp { .. } => "leveled_up",
            Self::LevelUpDismissed { .. } => "level_up_dismissed",
        }
    }
}
