use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub gemini: GeminiConfig,
}

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("GEMINI_API_KEY is not set".to_string()))?;

        let model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let api_base = lookup("GEMINI_API_BASE")
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout = lookup("GEMINI_TIMEOUT_SECS").unwrap_or_else(|| "60".to_string());
        let timeout = timeout
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| AppError::ConfigError(format!("Invalid GEMINI_TIMEOUT_SECS: {}", timeout)))?;

        // Load server configuration with defaults
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            gemini: GeminiConfig {
                api_key,
                model,
                api_base,
                request_timeout: Duration::from_secs(timeout),
            },
        })
    }
}
