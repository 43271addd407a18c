//! Story routes.

use crate::ApiError;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use saga_core::StoryResponse;
use saga_interface::Health;
use saga_narrative::{SessionId, SessionRegistry};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::instrument;

/// Header carrying the session id on requests and responses.
pub const SESSION_HEADER: &str = "x-session-id";

/// Shared state for the story routes.
#[derive(Clone)]
pub struct ApiState {
    registry: Arc<SessionRegistry<dyn Health>>,
}

impl ApiState {
    /// Creates API state around a session registry.
    pub fn new(registry: Arc<SessionRegistry<dyn Health>>) -> Self {
        Self { registry }
    }

    /// The session registry.
    pub fn registry(&self) -> &Arc<SessionRegistry<dyn Health>> {
        &self.registry
    }
}

/// Body of `POST /story`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartRequest {
    /// Story theme; may be empty when themes are generated
    #[serde(default)]
    pub theme: String,
}

/// Body of `POST /story/choice`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceRequest {
    /// The player's choice text
    pub choice: String,
}

/// Creates the story API router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/story",
            post(start_story).get(get_story).delete(reset_story),
        )
        .route("/story/choice", post(choose))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Session id from the request header, if present.
fn session_header(headers: &HeaderMap) -> Result<Option<SessionId>, ApiError> {
    match headers.get(SESSION_HEADER) {
        None => Ok(None),
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| ApiError::bad_request("x-session-id must be visible ASCII"))?;
            SessionId::new(raw)
                .map(Some)
                .map_err(|e| ApiError::bad_request(e.kind.to_string()))
        }
    }
}

fn require_session(headers: &HeaderMap) -> Result<SessionId, ApiError> {
    session_header(headers)?.ok_or_else(|| ApiError::bad_request("missing x-session-id header"))
}

fn with_session(id: &SessionId, story: StoryResponse) -> Result<impl IntoResponse + use<>, ApiError> {
    let value = HeaderValue::from_str(id.as_str())
        .map_err(|_| ApiError::bad_request("x-session-id must be visible ASCII"))?;
    Ok((
        StatusCode::OK,
        [(HeaderName::from_static(SESSION_HEADER), value)],
        Json(story),
    ))
}

/// Start (or restart) a story.
#[instrument(skip_all)]
async fn start_story(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Result<Json<StartRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let id = session_header(&headers)?.unwrap_or_else(SessionId::generate);

    let story = state.registry.start(id.clone(), &request.theme).await?;
    with_session(&id, story)
}

/// Apply a choice to the caller's story.
#[instrument(skip_all)]
async fn choose(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Result<Json<ChoiceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = require_session(&headers)?;
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let story = state.registry.advance(&id, &request.choice).await?;
    with_session(&id, story)
}

/// Discard the caller's story.
#[instrument(skip_all)]
async fn reset_story(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let id = require_session(&headers)?;
    state.registry.reset(&id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Snapshot of the caller's story.
#[instrument(skip_all)]
async fn get_story(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let id = require_session(&headers)?;
    let snapshot = state
        .registry
        .snapshot(&id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("no story for session {}", id)))?;
    Ok(Json(snapshot))
}

/// Health check endpoint.
async fn health_check(State(state): State<ApiState>) -> impl IntoResponse {
    let driver = state.registry.driver();
    let gateway = match driver.health().await {
        Ok(status) => status,
        Err(e) => saga_interface::HealthStatus::Unhealthy {
            message: e.to_string(),
        },
    };

    let status = if gateway.is_available() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if gateway.is_available() { "ok" } else { "unavailable" },
            "provider": driver.provider_name(),
            "model": driver.model_name(),
            "gateway": gateway,
        })),
    )
}
