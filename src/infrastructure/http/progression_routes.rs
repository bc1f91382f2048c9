//! Progression API routes
//!
//! One endpoint per tracker operation. Each returns the full snapshot after
//! the transition.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::{ChallengeDto, ProgressionSnapshotDto};
use crate::infrastructure::http::{parse_session_id, service_error};
use crate::infrastructure::state::AppState;

type SnapshotResult = Result<Json<ProgressionSnapshotDto>, (StatusCode, String)>;

pub async fn start_new_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> SnapshotResult {
    let session_id = parse_session_id(&id)?;
    state
        .progression_service
        .start_new_challenge(session_id)
        .await
        .map(Json)
        .map_err(service_error)
}

pub async fn reset_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> SnapshotResult {
    let session_id = parse_session_id(&id)?;
    state
        .progression_service
        .reset_challenge(session_id)
        .await
        .map(Json)
        .map_err(service_error)
}

pub async fn complete_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> SnapshotResult {
    let session_id = parse_session_id(&id)?;
    state
        .progression_service
        .completed_challenge(session_id)
        .await
        .map(Json)
        .map_err(service_error)
}

pub async fn level_up(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> SnapshotResult {
    let session_id = parse_session_id(&id)?;
    state
        .progression_service
        .level_up(session_id)
        .await
        .map(Json)
        .map_err(service_error)
}

pub async fn close_level_up_modal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> SnapshotResult {
    let session_id = parse_session_id(&id)?;
    state
        .progression_service
        .close_level_up_modal(session_id)
        .await
        .map(Json)
        .map_err(service_error)
}

/// The full challenge catalog
pub async fn list_challenges(State(state): State<Arc<AppState>>) -> Json<Vec<ChallengeDto>> {
    Json(
        state
            .progression_service
            .catalog()
            .challenges()
            .iter()
            .map(ChallengeDto::from)
            .collect(),
    )
}
