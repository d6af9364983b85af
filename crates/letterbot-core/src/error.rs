//! Error types for the letter bot

use letterbot_types::ProviderName;
use thiserror::Error;

/// Main error type for all letter bot operations
#[derive(Error, Debug)]
pub enum LetterBotError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Letter generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// Result type for letter bot operations
pub type Result<T> = std::result::Result<T, LetterBotError>;

/// Classification attached to every failed generation attempt.
///
/// Decides retry vs. fail-fast vs. advance to the next provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credential missing, placeholder, or rejected (401/403)
    Auth,
    /// Quota or billing exhausted, retrying cannot help
    Quota,
    /// Rate limited (429), retried with backoff within the provider budget
    RateLimit,
    /// Any other non-2xx vendor response
    Provider,
    /// 2xx response without usable generated text
    EmptyResponse,
    /// Connection error or timeout after exhausting retries
    Network,
    /// Generated text is missing a required structural marker
    FormatInvalid,
    /// No providers resolvable from configuration
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "auth",
            ErrorKind::Quota => "quota",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Provider => "provider_error",
            ErrorKind::EmptyResponse => "empty_response",
            ErrorKind::Network => "network_error",
            ErrorKind::FormatInvalid => "format_error",
            ErrorKind::Config => "config",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure from a generation attempt.
///
/// The dispatcher returns the last one of these after all configured
/// providers are exhausted, so the caller can show a specific diagnostic.
#[derive(Error, Debug, Clone)]
#[error("[{provider}/{kind}] {message}")]
pub struct GenerationError {
    pub kind: ErrorKind,
    pub provider: ProviderName,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: ErrorKind, provider: ProviderName, message: impl Into<String>) -> Self {
        Self {
            kind,
            provider,
            message: message.into(),
        }
    }
}
