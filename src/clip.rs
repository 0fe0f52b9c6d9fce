use serde::{Deserialize, Serialize};

/// One suggested excerpt of a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
}

impl Clip {
    pub fn new(
        title: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            description: description.into(),
        }
    }
}
