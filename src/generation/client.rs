use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::types::LlmClient;
use super::GenerationError;
use crate::config::GenerationConfig;

/// Blocking HTTP client for a local Ollama provider.
///
/// One non-streaming request per explanation. Connection refusal and
/// timeouts map to distinct error variants so the retry loop can tell a
/// dead provider from a slow one in its logs.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(&config.base_url, config.timeout_secs)
    }

    fn transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_connect() {
            GenerationError::ProviderConnection(self.base_url.clone())
        } else if e.is_timeout() {
            GenerationError::HttpClient(format!(
                "Request timed out after {}s",
                self.timeout_secs
            ))
        } else {
            GenerationError::HttpClient(e.to_string())
        }
    }

    fn reject_error_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, GenerationError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(GenerationError::ProviderStatus {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            })
        }
    }
}

/// Wire types for `/api/generate` and `/api/tags`.
#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateReply {
    response: String,
}

#[derive(Deserialize)]
struct TagsReply {
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, GenerationError> {
        let body = GenerateBody {
            model,
            prompt,
            system,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .map_err(|e| self.transport_error(e))?;
        let response = Self::reject_error_status(response)?;

        let reply: GenerateReply = response
            .json()
            .map_err(|e| GenerationError::ResponseParsing(e.to_string()))?;
        Ok(reply.response)
    }

    fn is_model_available(&self, model: &str) -> Result<bool, GenerationError> {
        Ok(self.list_models()?.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .map_err(|e| self.transport_error(e))?;
        let response = Self::reject_error_status(response)?;

        let reply: TagsReply = response
            .json()
            .map_err(|e| GenerationError::ResponseParsing(e.to_string()))?;
        Ok(reply.models.into_iter().map(|m| m.name).collect())
    }
}

/// In-memory [`LlmClient`] double for exercising the retry and fallback
/// machinery without a provider.
///
/// The response script is consumed one entry per `generate` call: a
/// `Some(text)` entry succeeds with that text, a `None` entry fails with a
/// connection error. Calls past the end of the script repeat its last
/// entry, so a one-entry script acts as a fixed response. The call counter
/// is shared and stays readable after the client has moved into an
/// orchestrator.
pub struct MockLlmClient {
    script: Vec<Option<String>>,
    models: Vec<String>,
    calls: Arc<AtomicUsize>,
}

impl MockLlmClient {
    /// Always replies with `text`.
    pub fn replying(text: &str) -> Self {
        Self::scripted(vec![Some(text)])
    }

    /// Follows `script` call by call.
    pub fn scripted(script: Vec<Option<&str>>) -> Self {
        Self {
            script: script.into_iter().map(|s| s.map(String::from)).collect(),
            models: vec!["medgemma:latest".to_string()],
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
    ) -> Result<String, GenerationError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let entry = self
            .script
            .get(index)
            .or_else(|| self.script.last())
            .cloned()
            .flatten();
        match entry {
            Some(text) => Ok(text),
            None => Err(GenerationError::ProviderConnection("mock provider".into())),
        }
    }

    fn is_model_available(&self, model: &str) -> Result<bool, GenerationError> {
        Ok(self.models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        Ok(self.models.clone())
    }
}
