use std::time::Duration;

use thiserror::Error;

/// Default retry budget for one explanation request.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Base backoff delay; attempt `n` is followed by `base * 2^(n-1)`.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// Default provider request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration problems surface here, at construction time, before any
/// request-specific processing. They indicate a deployment error and are
/// the only failures in this crate allowed to propagate.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Generation provider URL is empty")]
    EmptyProviderUrl,

    #[error("Generation provider URL must start with http:// or https://: {0}")]
    InvalidProviderUrl(String),

    #[error("Generation model name is empty")]
    EmptyModel,

    #[error("Missing required environment variable {0}")]
    MissingEnv(&'static str),
}

/// Provider selection and resilience settings for the Generation
/// Orchestrator. Constructed once per process and passed explicitly, so
/// multiple configurations (e.g. test doubles) can coexist.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub base_delay: Duration,
    /// When set, generated text is checked against the request's variant
    /// evidence and a high-severity contradiction counts as a failed
    /// attempt.
    pub self_check: bool,
}

impl GenerationConfig {
    pub fn new(base_url: &str, model: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ConfigError::EmptyProviderUrl);
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidProviderUrl(base_url.to_string()));
        }
        if model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        Ok(Self {
            base_url: base_url.to_string(),
            model: model.trim().to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            self_check: false,
        })
    }

    /// Local Ollama instance on the standard port.
    pub fn default_local() -> Self {
        Self::new("http://localhost:11434", "medgemma:latest")
            .expect("default configuration is valid")
    }

    /// Read provider settings from the environment. The URL is required;
    /// a missing model falls back to the local default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("PGX_PROVIDER_URL")
            .map_err(|_| ConfigError::MissingEnv("PGX_PROVIDER_URL"))?;
        let model =
            std::env::var("PGX_PROVIDER_MODEL").unwrap_or_else(|_| "medgemma:latest".into());
        Self::new(&url, &model)
    }

    pub fn with_self_check(mut self, enabled: bool) -> Self {
        self.self_check = enabled;
        self
    }

    pub fn with_retry(mut self, max_retries: usize, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }
}
