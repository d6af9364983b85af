//! Google Gemini provider
//!
//! Carries the most involved status classification of the chain: ambiguous
//! 429/403 responses are split between quota exhaustion and rate limiting by
//! matching vendor error vocabulary, which is best-effort rather than a
//! guaranteed contract.

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

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_MAX_RETRIES: u32 = 8;
const DEFAULT_BACKOFF_CAP_SECS: u64 = 120;
const DEFAULT_TIMEOUT_SECS: u64 = 25;

/// Vendor message vocabulary indicating exhausted quota or billing
const QUOTA_MARKERS: &[&str] = &[
    "quota",
    "exceed",
    "exhaust",
    "insufficient quota",
    "billing",
    "payment",
    "resource has been exhausted",
];

/// Vendor message vocabulary indicating per-interval rate limiting
const RATE_MARKERS: &[&str] = &[
    "rate",
    "rate limit",
    "too many requests",
    "per minute",
    "per second",
    "rpm",
    "rps",
    "requests per",
];

/// How an ambiguous 429/403 response was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Throttle {
    Quota,
    RateLimit,
    /// 429 whose message matched neither vocabulary; retried like a rate limit
    Unknown429,
    Other,
}

/// Classify a 429/403 payload by dedicated status field or message keywords
pub(crate) fn classify_throttle(status_code: StatusCode, payload: &Value) -> (Throttle, String) {
    let err = payload.get("error").cloned().unwrap_or(Value::Null);
    let status = err
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_ascii_uppercase();
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| payload.get("message").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();
    let message_l = message.to_ascii_lowercase();

    if status == "RESOURCE_EXHAUSTED" || status == "QUOTA_EXCEEDED" {
        return (Throttle::Quota, message);
    }

    if status_code == StatusCode::TOO_MANY_REQUESTS || status_code == StatusCode::FORBIDDEN {
        let quota = QUOTA_MARKERS.iter().any(|m| message_l.contains(m));
        let rate = RATE_MARKERS.iter().any(|m| message_l.contains(m));
        if quota && !rate {
            return (Throttle::Quota, message);
        }
        if rate {
            return (Throttle::RateLimit, message);
        }
        if status_code == StatusCode::TOO_MANY_REQUESTS {
            return (Throttle::Unknown429, message);
        }
    }

    (Throttle::Other, message)
}

pub struct GeminiProvider {
    api_key: String,
    model: String,
    max_retries: u32,
    backoff_cap: Duration,
    http_client: HttpClient,
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let timeout =
            Duration::from_secs(config.request_timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: config.api_key,
            model: config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_retries: config.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            backoff_cap: Duration::from_secs(
                config.backoff_cap_seconds.unwrap_or(DEFAULT_BACKOFF_CAP_SECS),
            ),
            http_client,
        }
    }

    async fn attempt(&self, prompt: &str) -> Result<String, AttemptError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let response = match self
            .http_client
            .post(&url)
            .json(&json!({"contents": [{"parts": [{"text": prompt}]}]}))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Err(transport_error(ProviderName::Gemini, e)),
        };

        let status = response.status();
        let retry_after = retry_after_header(&response);
        let payload = json_safely(response).await;

        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::FORBIDDEN {
            let (throttle, message) = classify_throttle(status, &payload);
            return Err(match throttle {
                Throttle::Quota => AttemptError::Fatal(GenerationError::new(
                    ErrorKind::Quota,
                    ProviderName::Gemini,
                    format!("Quota exhausted. {}", message),
                )),
                Throttle::RateLimit | Throttle::Unknown429 => AttemptError::Transient {
                    error: GenerationError::new(
                        ErrorKind::RateLimit,
                        ProviderName::Gemini,
                        if message.is_empty() {
                            format!("{} from Gemini", status.as_u16())
                        } else {
                            message
                        },
                    ),
                    retry_after,
                },
                // Bare 403 with neither vocabulary is an authorization failure
                Throttle::Other => AttemptError::Fatal(GenerationError::new(
                    ErrorKind::Auth,
                    ProviderName::Gemini,
                    format!("Forbidden (not retrying). {}", message),
                )),
            });
        }

        if !status.is_success() {
            return Err(non_success_error(status, &payload));
        }

        let text = payload
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AttemptError::Fatal(GenerationError::new(
                ErrorKind::EmptyResponse,
                ProviderName::Gemini,
                "Empty/invalid response from Gemini API",
            )));
        }

        Ok(text.to_string())
    }
}

/// Non-2xx outside the throttle statuses: gateway hiccups get the same short
/// backoff as network errors, everything else fails the provider immediately
fn non_success_error(status: StatusCode, payload: &Value) -> AttemptError {
    let message = payload
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| payload.get("message").and_then(Value::as_str))
        .map(String::from)
        .unwrap_or_else(|| format!("Gemini API returned {}", status));

    match status {
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            AttemptError::Transient {
                error: GenerationError::new(ErrorKind::Network, ProviderName::Gemini, message),
                retry_after: None,
            }
        }
        _ => AttemptError::Fatal(GenerationError::new(
            ErrorKind::Provider,
            ProviderName::Gemini,
            message,
        )),
    }
}

#[async_trait]
impl LetterProvider for GeminiProvider {
    fn name(&self) -> ProviderName {
        ProviderName::Gemini
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if is_placeholder_key(&self.api_key) {
            return Err(GenerationError::new(
                ErrorKind::Auth,
                ProviderName::Gemini,
                "Gemini API key is missing or placeholder",
            ));
        }

        with_retries(self.max_retries, self.backoff_cap, move || self.attempt(prompt)).await
    }
}
