//! OpenAI-compatible chat/completions providers (OpenAI, Groq)

use crate::config::ProviderConfig;
use crate::error::{ErrorKind, GenerationError};
use crate::providers::{
    is_placeholder_key, json_safely, retry_after_header, transport_error, with_retries,
    AttemptError, LetterProvider,
};
use async_trait::async_trait;
use letterbot_types::ProviderName;
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_MAX_RETRIES: u32 = 5;
const DEFAULT_BACKOFF_CAP_SECS: u64 = 60;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const SYSTEM_MESSAGE: &str =
    "You are a helpful assistant that follows formatting instructions exactly.";

/// Decide whether a 429 is actually exhausted quota.
///
/// OpenAI-style APIs report `insufficient_quota` as a 429 with a dedicated
/// error type/code rather than a distinct status.
pub(crate) fn quota_on_429(payload: &Value) -> (bool, String) {
    let err = payload.get("error").cloned().unwrap_or(Value::Null);
    let err_type = err
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_ascii_lowercase();
    let err_code = err
        .get("code")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_ascii_lowercase();
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Too Many Requests")
        .to_string();

    let quota = err_type.contains("insufficient")
        || err_code.contains("insufficient")
        || message.to_ascii_lowercase().contains("quota");
    (quota, message)
}

fn error_message(payload: &Value, fallback: &str) -> String {
    payload
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

pub struct OpenAiLikeProvider {
    name: ProviderName,
    base_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
    backoff_cap: Duration,
    http_client: HttpClient,
}

impl OpenAiLikeProvider {
    pub fn openai(config: ProviderConfig) -> Self {
        Self::with_endpoint(
            ProviderName::OpenAi,
            "https://api.openai.com/v1",
            "gpt-4o-mini",
            config,
        )
    }

    pub fn groq(config: ProviderConfig) -> Self {
        Self::with_endpoint(
            ProviderName::Groq,
            "https://api.groq.com/openai/v1",
            "llama-3.1-70b-versatile",
            config,
        )
    }

    fn with_endpoint(
        name: ProviderName,
        base_url: &str,
        default_model: &str,
        config: ProviderConfig,
    ) -> Self {
        let timeout =
            Duration::from_secs(config.request_timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model: config.model.unwrap_or_else(|| default_model.to_string()),
            max_retries: config.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            backoff_cap: Duration::from_secs(
                config.backoff_cap_seconds.unwrap_or(DEFAULT_BACKOFF_CAP_SECS),
            ),
            http_client,
        }
    }

    async fn attempt(&self, prompt: &str) -> Result<String, AttemptError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = match self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": SYSTEM_MESSAGE},
                    {"role": "user", "content": prompt}
                ],
                "temperature": 0.4
            }))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Err(transport_error(self.name, e)),
        };

        let status = response.status();
        let retry_after = retry_after_header(&response);
        let payload = json_safely(response).await;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AttemptError::Fatal(GenerationError::new(
                ErrorKind::Auth,
                self.name,
                error_message(&payload, "Forbidden/Unauthorized"),
            )));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let (quota, message) = quota_on_429(&payload);
            return Err(if quota {
                AttemptError::Fatal(GenerationError::new(ErrorKind::Quota, self.name, message))
            } else {
                AttemptError::Transient {
                    error: GenerationError::new(ErrorKind::RateLimit, self.name, message),
                    retry_after,
                }
            });
        }

        if status == StatusCode::PAYMENT_REQUIRED {
            return Err(AttemptError::Fatal(GenerationError::new(
                ErrorKind::Quota,
                self.name,
                error_message(&payload, "Payment required"),
            )));
        }

        if !status.is_success() {
            let message = error_message(&payload, &format!("API returned {}", status));
            return Err(match status {
                StatusCode::BAD_GATEWAY
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT => AttemptError::Transient {
                    error: GenerationError::new(ErrorKind::Network, self.name, message),
                    retry_after,
                },
                _ => AttemptError::Fatal(GenerationError::new(
                    ErrorKind::Provider,
                    self.name,
                    message,
                )),
            });
        }

        let text = payload
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AttemptError::Fatal(GenerationError::new(
                ErrorKind::EmptyResponse,
                self.name,
                "Empty response",
            )));
        }

        Ok(text.to_string())
    }
}

#[async_trait]
impl LetterProvider for OpenAiLikeProvider {
    fn name(&self) -> ProviderName {
        self.name
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if is_placeholder_key(&self.api_key) {
            return Err(GenerationError::new(
                ErrorKind::Auth,
                self.name,
                format!("{} API key is missing or placeholder", self.name),
            ));
        }

        with_retries(self.max_retries, self.backoff_cap, move || self.attempt(prompt)).await
    }
}
