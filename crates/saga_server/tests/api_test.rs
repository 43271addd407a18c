use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use saga_error::GatewayErrorKind;
use saga_interface::{Health, HealthStatus, MockDriver, MockResponse};
use saga_narrative::{NarrativeConfig, SessionRegistry};
use saga_server::{ApiState, SESSION_HEADER, create_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const REPLY: &str = "RESPONSE: The road forks.\nCHOICES:\n1. Left\n2. Right\n3. Wait\n4. Camp";

fn app(driver: MockDriver) -> Router {
    let driver: Arc<dyn Health> = Arc::new(driver);
    let registry = SessionRegistry::new(driver, NarrativeConfig::default());
    create_router(ApiState::new(Arc::new(registry)))
}

fn post(uri: &str, session: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn bare(method: &str, uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_start_and_choose() {
    let app = app(MockDriver::new_success(REPLY));

    let response = app
        .clone()
        .oneshot(post("/story", Some("abc"), json!({"theme": "frontier town"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[SESSION_HEADER], "abc");
    assert_eq!(
        json_body(response).await,
        json!({"narrative": "The road forks.", "choices": ["Left", "Right", "Wait", "Camp"]})
    );

    let response = app
        .clone()
        .oneshot(post("/story/choice", Some("abc"), json!({"choice": "Left"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(bare("GET", "/story", Some("abc"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let snapshot = json_body(response).await;
    assert_eq!(snapshot["turn"], 1);
    assert_eq!(snapshot["history_len"], 2);
    assert_eq!(snapshot["state"], "active");
    assert_eq!(snapshot["theme"], "frontier town");
}

#[tokio::test]
async fn test_start_generates_session_id() {
    let app = app(MockDriver::new_success(REPLY));

    let response = app
        .oneshot(post("/story", None, json!({"theme": "moon base"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let id = response.headers()[SESSION_HEADER].to_str().unwrap();
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn test_empty_theme_is_bad_request() {
    let app = app(MockDriver::new_success(REPLY));

    let response = app
        .oneshot(post("/story", Some("abc"), json!({"theme": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_blank_theme_restart_keeps_story() {
    let app = app(MockDriver::new_success(REPLY));
    app.clone()
        .oneshot(post("/story", Some("s"), json!({"theme": "glacier"})))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post("/story", Some("s"), json!({"theme": ""})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(bare("GET", "/story", Some("s"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["theme"], "glacier");
}

#[tokio::test]
async fn test_choice_requires_session_header() {
    let app = app(MockDriver::new_success(REPLY));

    let response = app
        .oneshot(post("/story/choice", None, json!({"choice": "Left"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_choice_before_start_is_conflict() {
    let app = app(MockDriver::new_success(REPLY));

    let response = app
        .oneshot(post("/story/choice", Some("nobody"), json!({"choice": "Left"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_choice_after_conclusion_is_conflict() {
    let app = app(MockDriver::new_success(REPLY));
    app.clone()
        .oneshot(post("/story", Some("s"), json!({"theme": "harbor"})))
        .await
        .unwrap();

    for _ in 0..10 {
        let response = app
            .clone()
            .oneshot(post("/story/choice", Some("s"), json!({"choice": "Left"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(post("/story/choice", Some("s"), json!({"choice": "Left"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_gateway_failure_is_bad_gateway() {
    let app = app(MockDriver::new_sequence(vec![
        MockResponse::Success(REPLY.to_string()),
        MockResponse::Error(GatewayErrorKind::Api {
            status: 500,
            message: "upstream".to_string(),
        }),
    ]));
    app.clone()
        .oneshot(post("/story", Some("s"), json!({"theme": "bayou"})))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post("/story/choice", Some("s"), json!({"choice": "Left"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = app.oneshot(bare("GET", "/story", Some("s"))).await.unwrap();
    assert_eq!(json_body(response).await["turn"], 0);
}

#[tokio::test]
async fn test_reset_is_idempotent() {
    let app = app(MockDriver::new_success(REPLY));
    app.clone()
        .oneshot(post("/story", Some("s"), json!({"theme": "tundra"})))
        .await
        .unwrap();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(bare("DELETE", "/story", Some("s")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = app.oneshot(bare("GET", "/story", Some("s"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app(MockDriver::new_success(REPLY));
    let request = Request::builder()
        .method("POST")
        .uri("/story")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_gateway() {
    let response = app(MockDriver::new_success(REPLY))
        .oneshot(bare("GET", "/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider"], "mock");

    let down = MockDriver::new_success(REPLY).with_health(HealthStatus::Unhealthy {
        message: "no route".to_string(),
    });
    let response = app(down).oneshot(bare("GET", "/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
