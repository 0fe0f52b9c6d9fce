use serde::{Deserialize, Serialize};
use serde_json::Value;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clip::Clip;
use crate::config::GeminiConfig;
use crate::error::GenerateError;
use crate::generator::ClipGenerator;
use crate::prompt::{build_prompt, CLIP_LIST_SCHEMA};

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClipPayload {
    List(Vec<Clip>),
    Wrapped { clips: Vec<Clip> },
}

/// Clip generator backed by the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClipGenerator {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClipGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerateError> {
        let client = ClientBuilder::new()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }
}

#[async_trait::async_trait]
impl ClipGenerator for GeminiClipGenerator {
    async fn generate(&self, url: &str) -> Result<Vec<Clip>, GenerateError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(url),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &CLIP_LIST_SCHEMA,
            },
        };

        info!(model = %self.config.model, %url, "requesting clip suggestions");
        let started = std::time::Instant::now();

        let res = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.config.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "model request rejected");
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: GenerateContentResponse = res.json().await?;
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
            .ok_or(GenerateError::EmptyResponse)?;

        debug!(chars = text.len(), elapsed = ?started.elapsed(), "model replied");

        let clips = parse_clips(&text)?;
        info!(count = clips.len(), elapsed = ?started.elapsed(), "clip suggestions received");
        Ok(clips)
    }
}

/// Parses model output into clips, tolerating a Markdown code fence around
/// the JSON.
pub fn parse_clips(text: &str) -> Result<Vec<Clip>, GenerateError> {
    let json = strip_code_fence(text);
    let payload: ClipPayload = serde_json::from_str(json)?;

    Ok(match payload {
        ClipPayload::List(clips) => clips,
        ClipPayload::Wrapped { clips } => clips,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Drop the info string ("json") on the opening fence line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
