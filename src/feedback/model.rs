//! Core `FeedbackModel` trait and the hosted `GeminiFeedback`
//! implementation.
//!
//! `GeminiFeedback` sends one composed prompt to the configured
//! `generateContent` endpoint and returns the reply text verbatim — no
//! streaming, no retries, no parsing of the reply's structure.  All
//! connection details come from [`FeedbackConfig`](crate::config::FeedbackConfig).

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ApiCredentials, FeedbackConfig};
use crate::gemini::{generate_url, GenerateRequest, GenerateResponse, GenerationConfig};

// ---------------------------------------------------------------------------
// FeedbackError
// ---------------------------------------------------------------------------

/// Errors that can occur while requesting feedback.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// HTTP transport or connection error.
    #[error("request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("feedback request timed out")]
    Timeout,

    /// The service refused to answer the prompt.
    #[error("feedback request blocked: {0}")]
    Blocked(String),

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse feedback response: {0}")]
    Parse(String),

    /// The model returned a response with no usable text content.
    #[error("feedback service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for FeedbackError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FeedbackError::Timeout
        } else {
            FeedbackError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// FeedbackModel trait
// ---------------------------------------------------------------------------

/// Async trait for feedback generation.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn FeedbackModel>`).
///
/// # Contract
///
/// - Exactly one request per call; the caller may repeat calls with an
///   identical prompt and must receive independent responses (the model is
///   non-deterministic, nothing is cached).
/// - The returned text is opaque display content.
#[async_trait]
pub trait FeedbackModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, FeedbackError>;
}

// ---------------------------------------------------------------------------
// GeminiFeedback
// ---------------------------------------------------------------------------

/// Hosted generative-language client for pronunciation feedback.
pub struct GeminiFeedback {
    client: reqwest::Client,
    config: FeedbackConfig,
    credentials: ApiCredentials,
}

impl GeminiFeedback {
    /// Build a feedback client from application config and the startup
    /// credential.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &FeedbackConfig, credentials: &ApiCredentials) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            credentials: credentials.clone(),
        }
    }
}

#[async_trait]
impl FeedbackModel for GeminiFeedback {
    async fn generate(&self, prompt: &str) -> Result<String, FeedbackError> {
        let mut request = GenerateRequest::from_text(prompt);
        request.generation_config = Some(GenerationConfig {
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
        });

        log::debug!(
            "feedback request: model={}, prompt len={}",
            self.config.model,
            prompt.len()
        );

        let url = generate_url(
            &self.config.base_url,
            &self.config.model,
            self.credentials.key(),
        );

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(FeedbackError::Request(format!(
                "feedback service returned {status}: {detail}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| FeedbackError::Parse(e.to_string()))?;

        if let Some(reason) = parsed.block_reason() {
            return Err(FeedbackError::Blocked(reason.to_string()));
        }

        let text = parsed.first_text().ok_or(FeedbackError::EmptyResponse)?;
        if text.is_empty() {
            return Err(FeedbackError::EmptyResponse);
        }

        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config() -> FeedbackConfig {
        FeedbackConfig::default()
    }

    fn make_credentials() -> ApiCredentials {
        ApiCredentials::new("k-test").expect("non-empty key")
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _model = GeminiFeedback::from_config(&make_config(), &make_credentials());
    }

    /// Verify that `GeminiFeedback` is object-safe (usable as `dyn FeedbackModel`).
    #[test]
    fn feedback_model_is_object_safe() {
        let model: Box<dyn FeedbackModel> =
            Box::new(GeminiFeedback::from_config(&make_config(), &make_credentials()));
        drop(model);
    }

    #[test]
    fn error_messages_carry_detail() {
        let err = FeedbackError::Blocked("SAFETY".into());
        assert!(err.to_string().contains("SAFETY"));

        let err = FeedbackError::Request("connection refused".into());
        assert!(err.to_string().contains("connection refused"));
    }
}
