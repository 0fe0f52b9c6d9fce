use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::controller::RequestState;

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub url: String,
}

#[derive(Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub state: RequestState,
    pub shows_empty_state: bool,
    pub observed_at: DateTime<Utc>,
}

impl From<RequestState> for StateResponse {
    fn from(state: RequestState) -> Self {
        Self {
            shows_empty_state: state.shows_empty_state(),
            state,
            observed_at: Utc::now(),
        }
    }
}
