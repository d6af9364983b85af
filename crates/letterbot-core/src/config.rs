//! Configuration management for the letter bot

use crate::error::{LetterBotError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure, loaded from a JSON credentials file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterBotConfig {
    pub telegram: TelegramConfig,

    #[serde(default = "default_pdf_service")]
    pub pdf_service: PdfServiceConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(alias = "token")] // Accept both 'bot_token' and 'token'
    pub bot_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfServiceConfig {
    pub base_url: String,
}

/// Generation provider configuration.
///
/// `order` is a comma-separated priority list of provider names; unknown
/// names are dropped with a warning and an empty result degrades to the
/// single default provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_provider_order")]
    pub order: String,

    #[serde(default)]
    pub gemini: ProviderConfig,

    #[serde(default)]
    pub openai: ProviderConfig,

    #[serde(default)]
    pub groq: ProviderConfig,

    #[serde(default)]
    pub huggingface: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            order: default_provider_order(),
            gemini: ProviderConfig::default(),
            openai: ProviderConfig::default(),
            groq: ProviderConfig::default(),
            huggingface: ProviderConfig::default(),
        }
    }
}

/// Per-provider knobs. All optional; vendor-specific defaults are applied
/// by the provider implementations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub max_retries: Option<u32>,

    #[serde(default)]
    pub backoff_cap_seconds: Option<u64>,

    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
}

// Default functions
fn default_pdf_service() -> PdfServiceConfig {
    PdfServiceConfig {
        base_url: "http://localhost:8000".to_string(),
    }
}

fn default_provider_order() -> String {
    "gemini".to_string()
}

impl LetterBotConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LetterBotError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LetterBotConfig = serde_json::from_str(json)
            .map_err(|e| LetterBotError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.is_empty() {
            return Err(LetterBotError::Config(
                "Telegram bot token is required".to_string(),
            ));
        }

        if self.pdf_service.base_url.is_empty() {
            return Err(LetterBotError::Config(
                "PDF service base_url must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
