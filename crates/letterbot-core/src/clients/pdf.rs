//! PDF rendering service client
//!
//! The generated letter is handed to an external rendering service; this
//! client never does text layout itself.

use crate::config::PdfServiceConfig;
use crate::error::{LetterBotError, Result};
use serde_json::json;

use reqwest::Client as HttpClient;

pub struct PdfClient {
    config: PdfServiceConfig,
    http_client: HttpClient,
}

impl PdfClient {
    pub fn new(config: PdfServiceConfig) -> Self {
        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Render a letter to PDF, returning the raw document bytes
    pub async fn render_letter(&self, letter_text: &str, filename: &str) -> Result<Vec<u8>> {
        let url = format!("{}/render-letter", self.config.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&json!({
                "filename": filename,
                "text": letter_text
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LetterBotError::ServiceUnavailable(format!(
                "PDF service returned {} - {}",
                status, error_text
            )));
        }

        let pdf_data = response.bytes().await?;
        Ok(pdf_data.to_vec())
    }

    /// Check PDF magic bytes before forwarding the document
    pub fn validate_pdf(&self, pdf_data: &[u8]) -> bool {
        pdf_data.len() >= 4 && pdf_data.starts_with(b"%PDF")
    }

    /// Check PDF service health
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.config.base_url);

        let response = self.http_client.get(&url).send().await;

        match response {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false), // Connection failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PdfClient {
        PdfClient::new(PdfServiceConfig {
            base_url: "http://localhost:8000".to_string(),
        })
    }

    #[test]
    fn valid_pdf_magic_is_accepted() {
        assert!(client().validate_pdf(b"%PDF-1.4\n...rest of pdf..."));
    }

    #[test]
    fn invalid_data_is_rejected() {
        let c = client();
        assert!(!c.validate_pdf(b"Not a PDF file"));
        assert!(!c.validate_pdf(b""));
        assert!(!c.validate_pdf(b"AB"));
    }
}
