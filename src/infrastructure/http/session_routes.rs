//! Session API routes
//!
//! Endpoints for opening, resuming and closing progression sessions.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::{ProgressionSnapshotDto, SessionResponseDto};
use crate::domain::value_objects::SeedValues;
use crate::infrastructure::client_cues::ClientCue;
use crate::infrastructure::http::{parse_session_id, service_error};
use crate::infrastructure::state::AppState;

/// Open a new session seeded with the client's stored counters
pub async fn open_session(
    State(state): State<Arc<AppState>>,
    Json(seed): Json<SeedValues>,
) -> Result<(StatusCode, Json<SessionResponseDto>), (StatusCode, String)> {
    let response = state
        .progression_service
        .open_session(seed)
        .await
        .map_err(service_error)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Rebuild a closed or idle-evicted session from its stored counters.
///
/// Answers 409 while the session is still open, leaving its active
/// challenge and level-up state untouched.
pub async fn resume_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponseDto>, (StatusCode, String)> {
    let session_id = parse_session_id(&id)?;
    state
        .progression_service
        .resume_session(session_id)
        .await
        .map(Json)
        .map_err(service_error)
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProgressionSnapshotDto>, (StatusCode, String)> {
    let session_id = parse_session_id(&id)?;
    state
        .progression_service
        .snapshot(session_id)
        .await
        .map(Json)
        .map_err(service_error)
}

/// End a session; its stored counters remain for a later resume
pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let session_id = parse_session_id(&id)?;
    state
        .progression_service
        .close_session(session_id)
        .await
        .map_err(service_error)?;
    state.client_cues.discard(session_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Hand over queued notifications and sounds
pub async fn drain_cues(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ClientCue>>, (StatusCode, String)> {
    let session_id = parse_session_id(&id)?;
    Ok(Json(state.client_cues.drain(session_id)))
}
