use crate::clip::Clip;
use crate::error::GenerateError;

/// Source of clip suggestions for a video URL.
///
/// Implementations may take arbitrarily long and may fail for any reason; the
/// controller treats every error the same way.
#[async_trait::async_trait]
pub trait ClipGenerator: Send + Sync {
    async fn generate(&self, url: &str) -> Result<Vec<Clip>, GenerateError>;
}
