use std::sync::Arc;

use scopeguard::ScopeGuard;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info, warn};
use url::Url;

use crate::clip::Clip;
use crate::error::ValidationError;
use crate::generator::ClipGenerator;

pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate clips. The AI might be busy or an error occurred. Please try again.";

/// Position of the controller in the generation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Loading,
    Success,
    Failed,
}

impl Phase {
    fn in_flight(self) -> bool {
        matches!(self, Phase::Validating | Phase::Loading)
    }
}

/// Everything a view needs to render the form and its results.
///
/// While `is_loading` is set, `clips` is empty and `error` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RequestState {
    pub url: String,
    pub clips: Vec<Clip>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub has_attempted: bool,
    pub phase: Phase,
}

impl RequestState {
    /// A finished attempt that produced nothing and did not fail.
    pub fn shows_empty_state(&self) -> bool {
        self.has_attempted && !self.is_loading && self.clips.is_empty() && self.error.is_none()
    }

    fn start_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.clips.clear();
        self.has_attempted = true;
        self.phase = Phase::Loading;
    }

    fn succeed(&mut self, clips: Vec<Clip>) {
        self.clips = clips;
        self.phase = Phase::Success;
        self.is_loading = false;
    }

    fn fail(&mut self) {
        self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
        self.phase = Phase::Failed;
        self.is_loading = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input failed validation; no request was made.
    Rejected(ValidationError),
    /// Another cycle is in flight; nothing changed.
    Busy,
    Completed { clips: Vec<Clip> },
    Failed,
}

/// Checks that `input` is a non-blank absolute URL with an authority and
/// returns it trimmed.
pub fn validate_url(input: &str) -> Result<&str, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let parsed = Url::parse(trimmed).map_err(|_| ValidationError::MalformedUrl)?;

    // The WHATWG parser turns "ftp:/bad" into "ftp://bad/", so the "//" must
    // be present in the input itself.
    let spelled_authority = trimmed
        .split_once(':')
        .is_some_and(|(_, rest)| rest.starts_with("//"));
    if !spelled_authority || parsed.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::MalformedUrl);
    }

    Ok(trimmed)
}

/// Owns the request state and runs one generation cycle at a time.
pub struct RequestController {
    generator: Arc<dyn ClipGenerator>,
    state: watch::Sender<RequestState>,
}

impl RequestController {
    pub fn new(generator: Arc<dyn ClipGenerator>) -> Self {
        let (state, _) = watch::channel(RequestState::default());
        Self { generator, state }
    }

    pub fn snapshot(&self) -> RequestState {
        self.state.borrow().clone()
    }

    /// Observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    pub fn set_url(&self, text: &str) {
        self.state.send_modify(|state| state.url = text.to_string());
    }

    /// Runs one generation cycle for `input`.
    ///
    /// `is_loading` is cleared exactly once per accepted cycle, including when
    /// the generator panics or this future is dropped while awaiting it; both
    /// of those settle the cycle as failed.
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let mut busy = false;
        self.state.send_if_modified(|state| {
            if state.phase.in_flight() {
                busy = true;
                return false;
            }
            state.url = input.to_string();
            state.phase = Phase::Validating;
            true
        });
        if busy {
            info!("submit ignored while a generation is in flight");
            return SubmitOutcome::Busy;
        }

        let url = match validate_url(input) {
            Ok(url) => url,
            Err(err) => {
                info!(reason = ?err, "input rejected");
                self.state.send_modify(|state| {
                    state.error = Some(err.to_string());
                    state.phase = Phase::Idle;
                });
                return SubmitOutcome::Rejected(err);
            }
        };

        self.state.send_modify(RequestState::start_loading);
        info!(%url, "generation started");

        let guard = scopeguard::guard(&self.state, |state| {
            warn!("generation ended without settling");
            state.send_modify(RequestState::fail);
        });

        let result = self.generator.generate(url).await;
        let state = ScopeGuard::into_inner(guard);

        match result {
            Ok(clips) => {
                info!(%url, count = clips.len(), "generation succeeded");
                state.send_modify(|s| s.succeed(clips.clone()));
                SubmitOutcome::Completed { clips }
            }
            Err(err) => {
                error!(%url, error = %err, "generation failed");
                state.send_modify(RequestState::fail);
                SubmitOutcome::Failed
            }
        }
    }
}
