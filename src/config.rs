use crate::error::{ImageGenError, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL_ID: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_JSON_LIMIT: usize = 50 * 1024 * 1024;

/// Environment variables checked for the API key, most preferred first.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Resolve the API key from `lookup`, walking [`API_KEY_VARS`] in order.
/// Blank values count as unset.
pub fn resolve_api_key<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| {
            ImageGenError::ConfigError(format!(
                "Missing API key. Set {} or {}",
                API_KEY_VARS[0], API_KEY_VARS[1]
            ))
        })
}

fn env_lookup(name: &str) -> Option<String> {
    env::var(name).ok()
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model_id: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        GeminiConfig {
            api_key: api_key.into(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = resolve_api_key(&lookup)?;
        let mut config = GeminiConfig::new(api_key);

        if let Some(model_id) = non_blank(lookup("GEMINI_IMAGE_MODEL")) {
            config.model_id = model_id;
        }
        if let Some(api_base) = non_blank(lookup("GEMINI_API_BASE")) {
            config.api_base = api_base;
        }
        if let Some(raw) = non_blank(lookup("GEMINI_TIMEOUT_SECS")) {
            let secs = raw.parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                ImageGenError::ConfigError(format!(
                    "GEMINI_TIMEOUT_SECS must be a positive whole number of seconds, got '{}'",
                    raw
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Parse a comma separated origin list. Empty input or a lone `*` is
    /// permissive.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }
}

impl Default for AllowedOrigins {
    fn default() -> Self {
        AllowedOrigins::Any
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: AllowedOrigins,
    pub json_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: AllowedOrigins::Any,
            json_limit: DEFAULT_JSON_LIMIT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(host) = non_blank(lookup("HOST")) {
            config.host = host;
        }
        if let Some(raw) = non_blank(lookup("PORT")) {
            config.port = raw.parse().map_err(|_| {
                ImageGenError::ConfigError(format!("PORT must be a valid port number, got '{}'", raw))
            })?;
        }
        if let Some(raw) = lookup("ALLOWED_ORIGINS") {
            config.allowed_origins = AllowedOrigins::parse(&raw);
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
