//! Production wiring of the bot step seam

use crate::clients::{PdfClient, TelegramClient};
use crate::config::LetterBotConfig;
use crate::error::{GenerationError, LetterBotError, Result};
use crate::flow::BotSteps;
use crate::services::letter_service::LetterService;
use crate::services::prompt::GenerationRequest;
use async_trait::async_trait;
use letterbot_types::{ApplicantFields, GeneratedLetter};

pub struct BotProcessor {
    telegram: TelegramClient,
    letters: LetterService,
    pdf: PdfClient,
}

impl BotProcessor {
    pub fn new(config: &LetterBotConfig) -> Self {
        Self {
            telegram: TelegramClient::new(config.telegram.clone()),
            letters: LetterService::from_config(&config.providers),
            pdf: PdfClient::new(config.pdf_service.clone()),
        }
    }
}

#[async_trait]
impl BotSteps for BotProcessor {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        self.telegram.send_message(chat_id, text).await
    }

    async fn send_typing(&self, chat_id: i64) -> Result<()> {
        self.telegram.send_chat_action(chat_id, "typing").await
    }

    async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        data: Vec<u8>,
        caption: &str,
    ) -> Result<()> {
        self.telegram
            .send_document(chat_id, filename, data, caption)
            .await
    }

    async fn generate_letter(
        &self,
        fields: &ApplicantFields,
    ) -> std::result::Result<GeneratedLetter, GenerationError> {
        let request = GenerationRequest::new(fields, chrono::Local::now().date_naive());
        self.letters.generate(&request.prompt).await
    }

    async fn render_pdf(&self, letter_text: &str, filename: &str) -> Result<Vec<u8>> {
        let data = self.pdf.render_letter(letter_text, filename).await?;

        if !self.pdf.validate_pdf(&data) {
            return Err(LetterBotError::ServiceUnavailable(
                "PDF service returned an invalid document".to_string(),
            ));
        }

        Ok(data)
    }
}
