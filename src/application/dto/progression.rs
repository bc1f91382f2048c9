use serde::{Deserialize, Serialize};

use crate::domain::aggregates::ProgressionTracker;
use crate::domain::entities::{Challenge, ChallengeKind};
use crate::domain::value_objects::SessionId;

/// Challenge as presented to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeDto {
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    pub description: String,
    pub amount: u32,
}

impl From<&Challenge> for ChallengeDto {
    fn from(value: &Challenge) -> Self {
        Self {
            kind: value.kind,
            description: value.description.clone(),
            amount: value.amount,
        }
    }
}

/// Full tracker state for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionSnapshotDto {
    pub level: u32,
    pub current_experience: u64,
    pub experience_to_next_level: u64,
    pub challenges_completed: u64,
    pub active_challenge: Option<ChallengeDto>,
    pub is_level_up_modal_open: bool,
    /// Fill of the experience bar
    pub experience_percent: u8,
}

impl From<&ProgressionTracker> for ProgressionSnapshotDto {
    fn from(tracker: &ProgressionTracker) -> Self {
        Self {
            level: tracker.level(),
            current_experience: tracker.current_experience(),
            experience_to_next_level: tracker.experience_to_next_level(),
            challenges_completed: tracker.challenges_completed(),
            active_challenge: tracker.active_challenge().map(ChallengeDto::from),
            is_level_up_modal_open: tracker.is_level_up_modal_open(),
            experience_percent: tracker.state().experience_percent(),
        }
    }
}

/// Response for opening or resuming a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseDto {
    pub session_id: SessionId,
    pub progress: ProgressionSnapshotDto,
}
