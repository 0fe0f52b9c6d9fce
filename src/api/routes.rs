use axum::{
    routing::{get, post},
    Router,
    extract::{Form, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use std::sync::Arc;
use tracing::{error, info};

use crate::api::models::{GenerateRequest, StateResponse};
use crate::api::response;
use crate::controller::{SubmitOutcome, GENERATION_FAILED_MESSAGE};
use crate::view::render_page;
use crate::AppState;

pub const BUSY_MESSAGE: &str = "A clip generation is already in progress.";

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/generate", post(form_handler))
        .route("/api/clips", post(generate_handler))
        .route("/api/state", get(state_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.controller.snapshot()))
}

async fn form_handler(
    State(state): State<AppState>,
    Form(req): Form<GenerateRequest>,
) -> Redirect {
    let controller = Arc::clone(&state.controller);
    let mut rx = controller.subscribe();
    let url = req.url;
    let mut task = tokio::spawn(async move { controller.submit(&url).await });

    // Redirect as soon as a cycle is loading so the page shows the spinner.
    // Rejected and busy submits finish the task first.
    tokio::select! {
        joined = &mut task => info!(outcome = ?joined.ok(), "form submission settled"),
        _ = rx.wait_for(|s| s.is_loading) => info!("form submission in flight"),
    }
    Redirect::to("/")
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> impl IntoResponse {
    let outcome = run_submit(&state, req.url).await;
    let snapshot = StateResponse::from(state.controller.snapshot());

    match outcome {
        SubmitOutcome::Completed { .. } => response::success(snapshot),
        SubmitOutcome::Rejected(err) => {
            response::error(StatusCode::BAD_REQUEST, Some(snapshot), err.to_string())
        }
        SubmitOutcome::Busy => {
            response::error(StatusCode::CONFLICT, Some(snapshot), BUSY_MESSAGE.to_string())
        }
        SubmitOutcome::Failed => response::error(
            StatusCode::BAD_GATEWAY,
            Some(snapshot),
            GENERATION_FAILED_MESSAGE.to_string(),
        ),
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "model": state.config.gemini.model,
    }))
}

async fn state_handler(State(state): State<AppState>) -> impl IntoResponse {
    response::success(StateResponse::from(state.controller.snapshot()))
}

/// Runs the submit on its own task so a dropped connection cannot cancel it.
async fn run_submit(state: &AppState, url: String) -> SubmitOutcome {
    let controller = Arc::clone(&state.controller);
    let task = tokio::spawn(async move { controller.submit(&url).await });

    match task.await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(error = %err, "generation task did not complete");
            SubmitOutcome::Failed
        }
    }
}
