//! Hugging Face Inference API provider

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

const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
const DEFAULT_MAX_RETRIES: u32 = 5;
const DEFAULT_BACKOFF_CAP_SECS: u64 = 60;
const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Build the inference URL from the configured model.
///
/// A full URL is accepted as-is (some operators paste the whole inference
/// endpoint into the model field); the deprecated api-inference host is
/// normalized to the router host either way.
pub(crate) fn endpoint_url(model: &str) -> String {
    let url = if model.to_ascii_lowercase().starts_with("http") {
        model.to_string()
    } else {
        format!("https://router.huggingface.co/models/{}", model)
    };

    url.replace("api-inference.huggingface.co", "router.huggingface.co")
}

/// Successful responses are either `[{"generated_text": ...}]` or an object
/// with a top-level `generated_text`, depending on the model
pub(crate) fn extract_generated_text(payload: &Value) -> Option<String> {
    let text = match payload {
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("generated_text"))
            .and_then(Value::as_str),
        Value::Object(_) => payload.get("generated_text").and_then(Value::as_str),
        _ => None,
    };

    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

fn error_message(payload: &Value, fallback: &str) -> String {
    payload
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

pub struct HuggingFaceProvider {
    api_key: String,
    url: String,
    max_retries: u32,
    backoff_cap: Duration,
    http_client: HttpClient,
}

impl HuggingFaceProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let timeout =
            Duration::from_secs(config.request_timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Self {
            api_key: config.api_key,
            url: endpoint_url(&model),
            max_retries: config.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            backoff_cap: Duration::from_secs(
                config.backoff_cap_seconds.unwrap_or(DEFAULT_BACKOFF_CAP_SECS),
            ),
            http_client,
        }
    }

    async fn attempt(&self, prompt: &str) -> Result<String, AttemptError> {
        let response = match self
            .http_client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "inputs": prompt,
                "parameters": {
                    "max_new_tokens": 700,
                    "temperature": 0.4,
                    "return_full_text": false
                },
                "options": {"wait_for_model": true}
            }))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Err(transport_error(ProviderName::HuggingFace, e)),
        };

        let status = response.status();
        let retry_after = retry_after_header(&response);
        let payload = json_safely(response).await;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AttemptError::Fatal(GenerationError::new(
                ErrorKind::Auth,
                ProviderName::HuggingFace,
                error_message(&payload, "Forbidden/Unauthorized"),
            )));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::Transient {
                error: GenerationError::new(
                    ErrorKind::RateLimit,
                    ProviderName::HuggingFace,
                    error_message(&payload, "Too Many Requests"),
                ),
                retry_after,
            });
        }

        if status == StatusCode::PAYMENT_REQUIRED {
            return Err(AttemptError::Fatal(GenerationError::new(
                ErrorKind::Quota,
                ProviderName::HuggingFace,
                error_message(&payload, "Payment required"),
            )));
        }

        if !status.is_success() {
            let message = error_message(&payload, &format!("Inference API returned {}", status));
            return Err(match status {
                StatusCode::BAD_GATEWAY
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT => AttemptError::Transient {
                    error: GenerationError::new(
                        ErrorKind::Network,
                        ProviderName::HuggingFace,
                        message,
                    ),
                    retry_after,
                },
                _ => AttemptError::Fatal(GenerationError::new(
                    ErrorKind::Provider,
                    ProviderName::HuggingFace,
                    message,
                )),
            });
        }

        match extract_generated_text(&payload) {
            Some(text) => Ok(text),
            None => Err(AttemptError::Fatal(GenerationError::new(
                ErrorKind::EmptyResponse,
                ProviderName::HuggingFace,
                "Unrecognized Hugging Face response format",
            ))),
        }
    }
}

#[async_trait]
impl LetterProvider for HuggingFaceProvider {
    fn name(&self) -> ProviderName {
        ProviderName::HuggingFace
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if is_placeholder_key(&self.api_key) {
            return Err(GenerationError::new(
                ErrorKind::Auth,
                ProviderName::HuggingFace,
                "Hugging Face API key is missing or placeholder",
            ));
        }

        with_retries(self.max_retries, self.backoff_cap, move || self.attempt(prompt)).await
    }
}
