//! Generative responder adapter.
//!
//! - `HttpTextGenerator` calls a Hugging Face-style text-generation endpoint.
//!   This is the production backend.
//! - `MockTextGenerator` returns scripted text and records every prompt.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use healthbot_core::config::{GenerationConfig, DEFAULT_MAX_LENGTH, NUM_RETURN_SEQUENCES};
use healthbot_core::error::HealthbotError;

/// Per-request generation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    /// Maximum length of the generated sequence in tokens.
    pub max_length: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl GenerationParams {
    /// Always [`NUM_RETURN_SEQUENCES`]; only the first candidate is used.
    pub fn num_return_sequences(&self) -> usize {
        NUM_RETURN_SEQUENCES
    }
}

/// Service producing a continuation for a prompt.
pub trait TextGenerator: Send + Sync {
    /// Generate one continuation of `prompt`.
    ///
    /// # Errors
    /// Implementations report backend failures as
    /// `HealthbotError::GenerationFailed` or
    /// `HealthbotError::ModelUnavailable`; callers treat both alike.
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<String, HealthbotError>> + Send;
}

/// Object-safe version of [`TextGenerator`] for dynamic dispatch.
///
/// A blanket implementation is provided so every `TextGenerator` can be
/// stored as `Arc<dyn DynTextGenerator>`.
pub trait DynTextGenerator: Send + Sync {
    fn generate_boxed<'a>(
        &'a self,
        prompt: &'a str,
        params: &'a GenerationParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, HealthbotError>> + Send + 'a>>;
}

impl<T: TextGenerator> DynTextGenerator for T {
    fn generate_boxed<'a>(
        &'a self,
        prompt: &'a str,
        params: &'a GenerationParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, HealthbotError>> + Send + 'a>> {
        Box::pin(self.generate(prompt, params))
    }
}

// ---------------------------------------------------------------------------
// HttpTextGenerator
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: RequestParameters,
}

#[derive(Serialize)]
struct RequestParameters {
    max_length: usize,
    num_return_sequences: usize,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct GeneratedCandidate {
    generated_text: String,
}

/// Inference servers answer either with a list of candidates or with a
/// single object.
#[derive(Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Many(Vec<GeneratedCandidate>),
    One(GeneratedCandidate),
}

/// Text-generation client for a Hugging Face-style inference endpoint.
///
/// Sends `{"inputs": ..., "parameters": {...}}` and returns the first
/// `generated_text`, which includes the echoed prompt unless
/// `strip_echoed_prompt` is enabled.
#[derive(Debug, Clone)]
pub struct HttpTextGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
    strip_echoed_prompt: bool,
}

impl HttpTextGenerator {
    /// Create a client for `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, HealthbotError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HealthbotError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_token: None,
            strip_echoed_prompt: false,
        })
    }

    pub fn from_config(config: &GenerationConfig) -> Result<Self, HealthbotError> {
        let generator = Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )?
        .with_api_token(config.api_token.clone())
        .with_strip_echoed_prompt(config.strip_echoed_prompt);
        info!(endpoint = %generator.endpoint, "Text generator configured");
        Ok(generator)
    }

    /// Send `Authorization: Bearer <token>`. An empty token sends nothing.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.api_token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub fn with_strip_echoed_prompt(mut self, strip: bool) -> Self {
        self.strip_echoed_prompt = strip;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn finish(&self, prompt: &str, text: String) -> String {
        if self.strip_echoed_prompt {
            if let Some(rest) = text.strip_prefix(prompt) {
                return rest.trim_start().to_string();
            }
        }
        text
    }
}

impl TextGenerator for HttpTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, HealthbotError> {
        let body = GenerationRequest {
            inputs: prompt,
            parameters: RequestParameters {
                max_length: params.max_length,
                num_return_sequences: params.num_return_sequences(),
                return_full_text: true,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(ref token) = self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                HealthbotError::GenerationFailed(format!("request timed out: {}", e))
            } else if e.is_connect() {
                HealthbotError::GenerationFailed(format!("endpoint unreachable: {}", e))
            } else {
                HealthbotError::GenerationFailed(format!("HTTP error: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(HealthbotError::GenerationFailed(format!(
                "endpoint returned {}: {}",
                status, detail
            )));
        }

        let parsed: GenerationResponse = response.json().await.map_err(|e| {
            HealthbotError::GenerationFailed(format!("malformed generation response: {}", e))
        })?;

        let text = match parsed {
            GenerationResponse::Many(candidates) => candidates
                .into_iter()
                .next()
                .map(|c| c.generated_text)
                .ok_or_else(|| {
                    HealthbotError::GenerationFailed("no candidates returned".to_string())
                })?,
            GenerationResponse::One(candidate) => candidate.generated_text,
        };

        debug!(chars = text.len(), "Generation complete");
        Ok(self.finish(prompt, text))
    }
}

// ---------------------------------------------------------------------------
// MockTextGenerator
// ---------------------------------------------------------------------------

/// Generator returning a fixed reply, or a fixed failure.
///
/// Records every prompt so tests can assert how often and with what the
/// generator was called.
#[derive(Debug)]
pub struct MockTextGenerator {
    reply: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockTextGenerator {
    /// Always answers with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with `ModelUnavailable`.
    pub fn unavailable() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl TextGenerator for MockTextGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, HealthbotError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.reply.clone().ok_or_else(|| {
            HealthbotError::ModelUnavailable("mock generation model not loaded".to_string())
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
