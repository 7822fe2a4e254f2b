//! The two persistence endpoints the timer logs against.
//!
//! Appends go through a mutex: the log file is a single JSON array
//! rewritten on every append, so writes must not interleave.

use std::sync::{Arc, Mutex};

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::error;

use pomolog_core::{SessionAction, SessionEvent, SessionLog, SessionType};

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    log: Arc<Mutex<SessionLog>>,
}

impl AppState {
    pub fn new(log: SessionLog) -> Self {
        Self {
            log: Arc::new(Mutex::new(log)),
        }
    }
}

/// Incoming record. `session_type` and `action` are required; the
/// timestamp is stamped server-side when the client omits it.
#[derive(Debug, Deserialize)]
struct LogSessionRequest {
    session_type: SessionType,
    action: SessionAction,
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    duration: u32,
    #[serde(default = "default_count")]
    cycle_count: u32,
    #[serde(default = "default_count")]
    session_count: u32,
}

fn default_count() -> u32 {
    1
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/log_session", post(log_session))
        .route("/sessions", get(get_sessions))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

async fn log_session(
    State(state): State<AppState>,
    payload: Result<Json<LogSessionRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": rejection.body_text() })),
            );
        }
    };

    let event = SessionEvent {
        session_type: req.session_type,
        action: req.action,
        timestamp: req.timestamp.unwrap_or_else(Utc::now),
        duration: req.duration,
        cycle_count: req.cycle_count,
        session_count: req.session_count,
    };

    let result = match state.log.lock() {
        Ok(log) => log.append(&event),
        Err(_) => {
            error!("session log mutex poisoned");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "session log unavailable" })),
            );
        }
    };

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Session logged successfully" })),
        ),
        Err(e) => {
            error!("failed to log session event: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}

async fn get_sessions(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let result = match state.log.lock() {
        Ok(log) => log.read_all(),
        Err(_) => {
            error!("session log mutex poisoned");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "session log unavailable" })),
            );
        }
    };

    match result {
        Ok(events) => (StatusCode::OK, Json(json!(events))),
        Err(e) => {
            error!("failed to read session history: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{self, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::new(dir.path().join("sessions.log"));
        (AppState::new(log), dir)
    }

    fn log_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/log_session")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn sessions_request() -> Request<Body> {
        Request::builder()
            .uri("/sessions")
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn logs_a_session_and_returns_it() {
        let (state, _dir) = test_state();
        let app = router(state);

        let body = r#"{
            "session_type": "work",
            "action": "complete",
            "timestamp": "2026-03-01T09:30:00Z",
            "duration": 1500,
            "cycle_count": 1,
            "session_count": 1
        }"#;
        let response = app.clone().oneshot(log_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let value = json_body(response).await;
        assert_eq!(value["success"], true);

        let response = app.oneshot(sessions_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let sessions = json_body(response).await;
        assert_eq!(sessions.as_array().unwrap().len(), 1);
        assert_eq!(sessions[0]["action"], "complete");
        assert_eq!(sessions[0]["session_type"], "work");
    }

    #[tokio::test]
    async fn missing_required_field_is_rejected() {
        let (state, _dir) = test_state();
        let app = router(state);
        let response = app
            .oneshot(log_request(r#"{"session_type": "work"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await.get("error").is_some());
    }

    #[tokio::test]
    async fn unknown_action_is_rejected() {
        let (state, _dir) = test_state();
        let app = router(state);
        let response = app
            .oneshot(log_request(
                r#"{"session_type": "work", "action": "explode"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_timestamp_is_stamped() {
        let (state, _dir) = test_state();
        let app = router(state);
        let response = app
            .clone()
            .oneshot(log_request(r#"{"session_type": "work", "action": "start"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let sessions = json_body(app.oneshot(sessions_request()).await.unwrap()).await;
        assert!(sessions[0]["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn empty_history_is_an_empty_array() {
        let (state, _dir) = test_state();
        let app = router(state);
        let response = app.oneshot(sessions_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));
    }
}
