use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use clip_suggester::{
    config::Config,
    api::routes::create_router,
    controller::RequestController,
    error::AppError,
    llm::GeminiClipGenerator,
    AppState,
};

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("clip_suggester=info,tower_http=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration (this also reads .env, which may set LOG_FORMAT)
    let config = Config::load()?;
    init_tracing();

    let server_addr = config.server_addr;
    info!(model = %config.gemini.model, "using Gemini model");

    let generator = GeminiClipGenerator::new(config.gemini.clone())
        .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

    // Create application state
    let app_state = AppState {
        config: Arc::new(config),
        controller: Arc::new(RequestController::new(Arc::new(generator))),
    };

    // Build the router with routes
    let app = create_router(app_state);

    // Create the listener
    let listener = TcpListener::bind(server_addr).await?;

    info!(%server_addr, "listening");
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::ServerError(e.to_string()))?;

    Ok(())
}
