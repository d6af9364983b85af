//! Generation provider integrations
//!
//! Each provider implements the [`LetterProvider`] capability trait; the
//! dispatcher in `services::letter_service` tries them in configured order.

pub mod backoff;
pub mod gemini;
pub mod huggingface;
pub mod openai_like;

// Re-export provider types
pub use gemini::GeminiProvider;
pub use huggingface::HuggingFaceProvider;
pub use openai_like::OpenAiLikeProvider;

use crate::config::ProvidersConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use letterbot_types::ProviderName;
use std::future::Future;
use std::time::Duration;

/// Provider substituted when the configured order resolves to nothing
pub const DEFAULT_PROVIDER: ProviderName = ProviderName::Gemini;

/// Capability interface for a named text-generation integration.
///
/// Implementations own their intra-call retry budget; a returned error is
/// final for that provider and makes the dispatcher advance to the next one.
/// Mock implementations of this trait are how the dispatcher is tested.
#[async_trait]
pub trait LetterProvider: Send + Sync {
    fn name(&self) -> ProviderName;

    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError>;
}

/// Resolve a comma-separated provider order into known provider names.
///
/// Unknown names are dropped with a configuration warning; an empty result
/// substitutes the single default provider.
pub fn resolve_order(order: &str) -> Vec<ProviderName> {
    let mut resolved = Vec::new();
    for raw in order.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        match raw.parse::<ProviderName>() {
            Ok(name) => resolved.push(name),
            Err(e) => log::warn!("Dropping unrecognized entry in provider order: {}", e),
        }
    }

    if resolved.is_empty() {
        log::warn!(
            "No resolvable providers configured, falling back to '{}'",
            DEFAULT_PROVIDER
        );
        resolved.push(DEFAULT_PROVIDER);
    }

    resolved
}

/// Build the ordered provider chain from configuration
pub fn build_providers(config: &ProvidersConfig) -> Vec<Box<dyn LetterProvider>> {
    resolve_order(&config.order)
        .into_iter()
        .map(|name| match name {
            ProviderName::Gemini => {
                Box::new(GeminiProvider::new(config.gemini.clone())) as Box<dyn LetterProvider>
            }
            ProviderName::OpenAi => Box::new(OpenAiLikeProvider::openai(config.openai.clone())),
            ProviderName::Groq => Box::new(OpenAiLikeProvider::groq(config.groq.clone())),
            ProviderName::HuggingFace => {
                Box::new(HuggingFaceProvider::new(config.huggingface.clone()))
            }
        })
        .collect()
}

/// True for credentials that must be rejected before any network call
pub(crate) fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || key.to_ascii_lowercase().starts_with("your_")
}

/// Outcome of a single outbound call, before the retry policy is applied
pub(crate) enum AttemptError {
    /// Retrying cannot change the outcome; the provider fails with this error
    Fatal(GenerationError),
    /// Rate limit or transport failure, retried within the provider budget
    Transient {
        error: GenerationError,
        retry_after: Option<Duration>,
    },
}

/// Map a reqwest transport failure (connection error, timeout) to a
/// retryable network error
pub(crate) fn transport_error(provider: ProviderName, e: reqwest::Error) -> AttemptError {
    let what = if e.is_timeout() {
        "request timed out"
    } else {
        "request failed"
    };
    AttemptError::Transient {
        error: GenerationError::new(
            crate::error::ErrorKind::Network,
            provider,
            format!("{}: {}", what, e),
        ),
        retry_after: None,
    }
}

/// Read a response body as JSON, degrading to null on empty or non-JSON
/// bodies so classification can still look at the status code
pub(crate) async fn json_safely(response: reqwest::Response) -> serde_json::Value {
    response
        .json::<serde_json::Value>()
        .await
        .unwrap_or(serde_json::Value::Null)
}

/// Extract the Retry-After header as a delay, if present and parseable
pub(crate) fn retry_after_header(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(backoff::parse_retry_after)
}

/// Run `call` up to `max_retries` times, sleeping between transient failures.
///
/// An explicit Retry-After from the response is honored capped at `cap`;
/// otherwise the wait is full-jitter exponential backoff. The sleep is local
/// to this call and never blocks unrelated generation requests.
pub(crate) async fn with_retries<F, Fut>(
    max_retries: u32,
    cap: Duration,
    mut call: F,
) -> std::result::Result<String, GenerationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<String, AttemptError>>,
{
    let max_retries = max_retries.max(1);
    let mut attempt = 1;

    loop {
        match call().await {
            Ok(text) => return Ok(text),
            Err(AttemptError::Fatal(error)) => return Err(error),
            Err(AttemptError::Transient { error, retry_after }) => {
                if attempt >= max_retries {
                    return Err(error);
                }

                let wait = backoff::retry_wait(retry_after, attempt, cap);
                log::warn!(
                    "{} - retrying after {:.1}s (attempt {}/{})",
                    error,
                    wait.as_secs_f64(),
                    attempt,
                    max_retries
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
        }
    }
}
