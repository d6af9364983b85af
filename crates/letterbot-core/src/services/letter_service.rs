//! Letter generation dispatcher with ordered provider fallback

use crate::config::ProvidersConfig;
use crate::error::{ErrorKind, GenerationError};
use crate::providers::{build_providers, LetterProvider, DEFAULT_PROVIDER};
use crate::services::prompt::validate_format;
use letterbot_types::GeneratedLetter;

/// Tries the configured providers in priority order until one returns a
/// format-valid letter.
///
/// Each invocation is independent: no caching, no cross-request state, so
/// concurrent generation requests never contend with each other.
pub struct LetterService {
    providers: Vec<Box<dyn LetterProvider>>,
}

impl LetterService {
    pub fn from_config(config: &ProvidersConfig) -> Self {
        Self {
            providers: build_providers(config),
        }
    }

    /// Build from explicit provider implementations (used by tests)
    pub fn new(providers: Vec<Box<dyn LetterProvider>>) -> Self {
        Self { providers }
    }

    /// Attempt generation across providers; returns the first validated
    /// letter, or the last classified error once the order is exhausted.
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedLetter, GenerationError> {
        let mut last_error: Option<GenerationError> = None;

        for provider in &self.providers {
            let name = provider.name();
            log::info!("Attempting letter generation with provider '{}'", name);

            match provider.generate(prompt).await {
                Ok(text) => {
                    if validate_format(&text) {
                        log::info!("Provider '{}' produced a valid letter", name);
                        return Ok(GeneratedLetter::new(text, name));
                    }

                    // HTTP success is not acceptance: a letter missing a
                    // structural marker is rejected without retry
                    log::warn!(
                        "Provider '{}' returned text missing a required marker, advancing",
                        name
                    );
                    last_error = Some(GenerationError::new(
                        ErrorKind::FormatInvalid,
                        name,
                        "Generated letter doesn't follow the required format",
                    ));
                }
                Err(e) => {
                    log::warn!("Provider '{}' failed ({}): {}, advancing", name, e.kind, e.message);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            GenerationError::new(
                ErrorKind::Config,
                DEFAULT_PROVIDER,
                "No generation providers configured",
            )
        }))
    }
}
