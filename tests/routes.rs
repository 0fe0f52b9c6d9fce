use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tokio::sync::Notify;
use tower::ServiceExt;

use clip_suggester::api::routes::{create_router, BUSY_MESSAGE};
use clip_suggester::clip::Clip;
use clip_suggester::config::{Config, GeminiConfig};
use clip_suggester::controller::{RequestController, GENERATION_FAILED_MESSAGE};
use clip_suggester::error::GenerateError;
use clip_suggester::generator::ClipGenerator;
use clip_suggester::AppState;

struct FixedGenerator(Option<Vec<Clip>>);

#[async_trait::async_trait]
impl ClipGenerator for FixedGenerator {
    async fn generate(&self, _url: &str) -> Result<Vec<Clip>, GenerateError> {
        self.0.clone().ok_or(GenerateError::EmptyResponse)
    }
}

/// Resolves with no clips once the gate is opened.
struct GatedGenerator(Arc<Notify>);

#[async_trait::async_trait]
impl ClipGenerator for GatedGenerator {
    async fn generate(&self, _url: &str) -> Result<Vec<Clip>, GenerateError> {
        self.0.notified().await;
        Ok(Vec::new())
    }
}

fn app(generator: impl ClipGenerator + 'static) -> (Router, Arc<RequestController>) {
    let controller = Arc::new(RequestController::new(Arc::new(generator)));
    let config = Config {
        server_addr: "127.0.0.1:0".parse().unwrap(),
        gemini: GeminiConfig {
            api_key: "unused".to_string(),
            model: "gemini-test".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            request_timeout: Duration::from_secs(1),
        },
    };
    let state = AppState {
        config: Arc::new(config),
        controller: controller.clone(),
    };
    (create_router(state), controller)
}

fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn api_clips_returns_state_on_success() {
    let (router, _) = app(FixedGenerator(Some(vec![Clip::new("Intro", "0:00", "0:30", "...")])));

    let response = router
        .oneshot(json_post("/api/clips", r#"{"url": "https://youtu.be/abc123"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["meta"]["status"], "success");
    assert_eq!(body["data"]["is_loading"], false);
    assert_eq!(body["data"]["phase"], "success");
    assert_eq!(body["data"]["clips"][0]["startTime"], "0:00");
    assert_eq!(body["data"]["shows_empty_state"], false);
}

#[tokio::test]
async fn api_clips_rejects_invalid_input() {
    let (router, _) = app(FixedGenerator(Some(Vec::new())));

    let response = router
        .oneshot(json_post("/api/clips", r#"{"url": "ftp:/bad"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(
        body["meta"]["message"],
        "The entered URL is not valid. Please check and try again."
    );
    assert_eq!(body["data"]["has_attempted"], false);
}

#[tokio::test]
async fn api_clips_maps_generator_failure_to_bad_gateway() {
    let (router, _) = app(FixedGenerator(None));

    let response = router
        .oneshot(json_post("/api/clips", r#"{"url": "https://youtu.be/abc123"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json(response).await;
    assert_eq!(body["meta"]["message"], GENERATION_FAILED_MESSAGE);
    assert_eq!(body["data"]["error"], GENERATION_FAILED_MESSAGE);
}

#[tokio::test]
async fn form_submit_redirects_and_page_shows_empty_state() {
    let (router, controller) = app(FixedGenerator(Some(Vec::new())));

    let response = router
        .clone()
        .oneshot(
            Request::post("/generate")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("url=https%3A%2F%2Fyoutu.be%2Fabc123"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    controller
        .subscribe()
        .wait_for(|state| state.shows_empty_state())
        .await
        .unwrap();

    let page = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let html = String::from_utf8(to_bytes(page.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();
    assert!(html.contains("No Clips Generated"));
    assert!(html.contains("value=\"https://youtu.be/abc123\""));
}

#[tokio::test]
async fn state_and_health_endpoints() {
    let (router, _) = app(FixedGenerator(Some(Vec::new())));

    let response = router
        .clone()
        .oneshot(Request::get("/api/state").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["phase"], "idle");
    assert_eq!(body["data"]["clips"], Value::Array(Vec::new()));

    let health = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = read_json(health).await;
    assert_eq!(body["model"], "gemini-test");
}

fn form_post(url: &str) -> Request<Body> {
    Request::post("/generate")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("url={url}")))
        .unwrap()
}

#[tokio::test]
async fn form_submit_redirects_while_loading_and_page_shows_spinner() {
    let gate = Arc::new(Notify::new());
    let (router, controller) = app(GatedGenerator(gate.clone()));

    let response = tokio::time::timeout(
        Duration::from_secs(2),
        router.clone().oneshot(form_post("https%3A%2F%2Fyoutu.be%2Fabc123")),
    )
    .await
    .expect("redirect before the generator settles")
    .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(controller.snapshot().is_loading);

    let page = router
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let html = String::from_utf8(to_bytes(page.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();
    assert!(html.contains("class=\"spinner\""));
    assert!(html.contains("http-equiv=\"refresh\""));

    gate.notify_one();
    controller
        .subscribe()
        .wait_for(|state| state.shows_empty_state())
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_form_submit_sets_error_before_redirect() {
    let (router, controller) = app(FixedGenerator(Some(Vec::new())));

    let response = router.oneshot(form_post("not+a+url")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        controller.snapshot().error.as_deref(),
        Some("The entered URL is not valid. Please check and try again.")
    );
}

#[tokio::test]
async fn second_submit_while_loading_is_busy() {
    let gate = Arc::new(Notify::new());
    let (router, controller) = app(GatedGenerator(gate.clone()));

    let first = tokio::spawn(
        router
            .clone()
            .oneshot(json_post("/api/clips", r#"{"url": "https://youtu.be/first"}"#)),
    );
    controller.subscribe().wait_for(|state| state.is_loading).await.unwrap();

    let second = router
        .clone()
        .oneshot(json_post("/api/clips", r#"{"url": "https://youtu.be/second"}"#))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = read_json(second).await;
    assert_eq!(body["meta"]["message"], BUSY_MESSAGE);
    assert_eq!(body["data"]["url"], "https://youtu.be/first");
    assert_eq!(body["data"]["is_loading"], true);

    // A busy form post still redirects straight away.
    let form = router
        .oneshot(form_post("https%3A%2F%2Fyoutu.be%2Fthird"))
        .await
        .unwrap();
    assert_eq!(form.status(), StatusCode::SEE_OTHER);
    assert_eq!(controller.snapshot().url, "https://youtu.be/first");

    gate.notify_one();
    let first = first.await.unwrap().unwrap();
    assert_eq!(first.status(), StatusCode::OK);
}
