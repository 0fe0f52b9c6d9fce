#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Server error: {0}")]
    ServerError(String),
}

/// Input rejected before any request is made. The `Display` text is what the
/// user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid YouTube URL.")]
    EmptyInput,

    #[error("The entered URL is not valid. Please check and try again.")]
    MalformedUrl,
}

/// Failure of a clip generator call. Never shown to the user verbatim.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("request to the model failed: {0}")]
    Transport(reqwest::Error),

    #[error("model returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model response carried no text")]
    EmptyResponse,

    #[error("model response is not a clip list: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for GenerateError {
    // The request URL is dropped so it never reaches logs.
    fn from(err: reqwest::Error) -> Self {
        GenerateError::Transport(err.without_url())
    }
}

impl From<serde_json::Error> for GenerateError {
    fn from(err: serde_json::Error) -> Self {
        GenerateError::Malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
