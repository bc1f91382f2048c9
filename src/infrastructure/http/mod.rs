//! HTTP REST API routes

mod progression_routes;
mod session_routes;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::application::services::ProgressionServiceError;
use crate::domain::value_objects::SessionId;
use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Session routes
        .route("/api/sessions", post(session_routes::open_session))
        .route(
            "/api/sessions/{id}",
            get(session_routes::get_session).delete(session_routes::close_session),
        )
        .route("/api/sessions/{id}/resume", post(session_routes::resume_session))
        .route("/api/sessions/{id}/cues", get(session_routes::drain_cues))
        // Progression routes
        .route(
            "/api/sessions/{id}/challenge",
            post(progression_routes::start_new_challenge),
        )
        .route(
            "/api/sessions/{id}/challenge/reset",
            post(progression_routes::reset_challenge),
        )
        .route(
            "/api/sessions/{id}/challenge/complete",
            post(progression_routes::complete_challenge),
        )
        .route("/api/sessions/{id}/level-up", post(progression_routes::level_up))
        .route(
            "/api/sessions/{id}/level-up/close",
            post(progression_routes::close_level_up_modal),
        )
        // Catalog
        .route("/api/challenges", get(progression_routes::list_challenges))
}

pub(crate) fn parse_session_id(id: &str) -> Result<SessionId, (StatusCode, String)> {
    id.parse()
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid session ID".to_string()))
}

pub(crate) fn service_error(e: ProgressionServiceError) -> (StatusCode, String) {
    match e {
        ProgressionServiceError::SessionNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        ProgressionServiceError::SessionAlreadyOpen(_) => (StatusCode::CONFLICT, e.to_string()),
        ProgressionServiceError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::application::ports::outbound::NotificationPermission;
    use crate::domain::value_objects::MAX_LEVEL;
    use crate::infrastructure::catalog::parse_catalog;
    use crate::infrastructure::config::{AppConfig, StorageBackend};
    use crate::infrastructure::persistence::InMemoryProgressRepository;

    fn test_app() -> Router {
        let config = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            storage: StorageBackend::Memory,
            server_port: 0,
            challenges_path: None,
            notification_permission: NotificationPermission::Granted,
            notification_sound: "/notification.mp3".to_string(),
            session_idle_timeout: std::time::Duration::from_secs(3600),
            rng_seed: Some(9),
        };
        let catalog = parse_catalog(
            r#"[{ "type": "eye", "description": "Look out of the window", "amount": 20 }]"#,
        )
        .unwrap();
        let state = AppState::with_parts(config, catalog, Arc::new(InMemoryProgressRepository::new()));

        create_routes().with_state(Arc::new(state))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_challenge_lifecycle_over_http() {
        let app = test_app();

        let (status, opened) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(json!({ "level": 1, "currentExperience": 50 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = opened["sessionId"].as_str().unwrap().to_string();
        assert_eq!(opened["progress"]["experienceToNextLevel"], 64);

        let (status, started) = send(&app, "POST", &format!("/api/sessions/{}/challenge", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(started["activeChallenge"]["type"], "eye");
        assert_eq!(started["activeChallenge"]["amount"], 20);

        let (_, completed) = send(
            &app,
            "POST",
            &format!("/api/sessions/{}/challenge/complete", id),
            None,
        )
        .await;
        assert_eq!(completed["level"], 2);
        assert_eq!(completed["currentExperience"], 6);
        assert_eq!(completed["challengesCompleted"], 1);
        assert_eq!(completed["activeChallenge"], Value::Null);
        assert_eq!(completed["isLevelUpModalOpen"], true);

        let (_, closed) = send(
            &app,
            "POST",
            &format!("/api/sessions/{}/level-up/close", id),
            None,
        )
        .await;
        assert_eq!(closed["isLevelUpModalOpen"], false);

        let (_, cues) = send(&app, "GET", &format!("/api/sessions/{}/cues", id), None).await;
        let cues = cues.as_array().unwrap();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0]["type"], "sound");
        assert_eq!(cues[1]["type"], "notification");
        assert_eq!(cues[1]["body"], "Valendo 20xp!");
    }

    #[tokio::test]
    async fn test_close_then_resume_keeps_counters() {
        let app = test_app();
        let (_, opened) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(json!({ "level": 6, "challengesCompleted": 40 })),
        )
        .await;
        let id = opened["sessionId"].as_str().unwrap().to_string();

        let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", &format!("/api/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, resumed) = send(&app, "POST", &format!("/api/sessions/{}/resume", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resumed["progress"]["level"], 6);
        assert_eq!(resumed["progress"]["challengesCompleted"], 40);
        assert_eq!(resumed["progress"]["currentExperience"], 0);
    }

    #[tokio::test]
    async fn test_resume_of_open_session_conflicts() {
        let app = test_app();
        let (_, opened) = send(&app, "POST", "/api/sessions", Some(json!({}))).await;
        let id = opened["sessionId"].as_str().unwrap().to_string();

        let (status, _) = send(&app, "POST", &format!("/api/sessions/{}/resume", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_huge_seed_level_is_capped() {
        let app = test_app();
        let (status, opened) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(json!({ "level": 1073741824u32, "currentExperience": 368934881474191032u64 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(opened["progress"]["level"], MAX_LEVEL);
        assert_eq!(opened["progress"]["experiencePercent"], 100);

        let id = opened["sessionId"].as_str().unwrap().to_string();
        let (status, leveled) = send(&app, "POST", &format!("/api/sessions/{}/level-up", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(leveled["level"], MAX_LEVEL);
    }

    #[tokio::test]
    async fn test_bad_and_unknown_session_ids() {
        let app = test_app();

        let (status, _) = send(&app, "POST", "/api/sessions/not-a-uuid/challenge", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let unknown = SessionId::new();
        let (status, _) = send(&app, "POST", &format!("/api/sessions/{}/level-up", unknown), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_challenges() {
        let app = test_app();
        let (status, challenges) = send(&app, "GET", "/api/challenges", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(challenges.as_array().unwrap().len(), 1);
        assert_eq!(challenges[0]["description"], "Look out of the window");
    }
}
