pub mod api;
pub mod clip;
pub mod config;
pub mod controller;
pub mod error;
pub mod generator;
pub mod llm;
pub mod prompt;
pub mod view;

use std::sync::Arc;
use config::Config;
use controller::RequestController;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub controller: Arc<RequestController>,
}
