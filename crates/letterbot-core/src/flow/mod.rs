//! Conversation flow: ordered field collection, answer validation and
//! letter delivery
//!
//! The side-effecting seam is the [`BotSteps`] trait, so the flow logic is
//! tested against mock implementations without any network.

pub mod validate;

use crate::error::{GenerationError, Result};
use crate::session::SessionStore;
use async_trait::async_trait;
use letterbot_types::{ApplicantFields, FieldKey, GeneratedLetter, SessionState};

const WELCOME: &str = "👋 Welcome! I'll help you generate a job application letter.\n\n\
    Type /start to begin or /reset at any time to start over.";

const NUDGE: &str = "❗ Please type /start to begin.";

const RESET_CONFIRM: &str = "🔄 Conversation reset. Type /start to begin.";

/// Side effects the flow needs: chat delivery, letter generation and PDF
/// rendering. Production wiring lives in `services::BotProcessor`.
#[async_trait]
pub trait BotSteps: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;

    async fn send_typing(&self, chat_id: i64) -> Result<()>;

    async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        data: Vec<u8>,
        caption: &str,
    ) -> Result<()>;

    async fn generate_letter(
        &self,
        fields: &ApplicantFields,
    ) -> std::result::Result<GeneratedLetter, GenerationError>;

    async fn render_pdf(&self, letter_text: &str, filename: &str) -> Result<Vec<u8>>;
}

/// Drives one chat through the field questions and hands the completed
/// answers to the generation pipeline
pub struct FlowHandler<T: BotSteps> {
    steps: T,
    store: SessionStore,
}

impl<T: BotSteps> FlowHandler<T> {
    pub fn new(steps: T, store: SessionStore) -> Self {
        Self { steps, store }
    }

    pub fn steps(&self) -> &T {
        &self.steps
    }

    /// Entry point for every incoming chat message
    pub async fn handle_message(&self, chat_id: i64, text: &str) -> Result<()> {
        match text.trim() {
            "/start" | "/help" => {
                let session = SessionState::new(chat_id);
                self.store.save(&session)?;
                log::info!("Started new session for chat {}", chat_id);
                self.steps.send_message(chat_id, WELCOME).await?;
                self.ask_next(chat_id, &session).await
            }
            "/reset" => {
                self.store.remove(chat_id)?;
                log::info!("Reset session for chat {}", chat_id);
                self.steps.send_message(chat_id, RESET_CONFIRM).await
            }
            answer => self.handle_answer(chat_id, answer).await,
        }
    }

    async fn handle_answer(&self, chat_id: i64, answer: &str) -> Result<()> {
        let Some(mut session) = self.store.load(chat_id)? else {
            return self.steps.send_message(chat_id, NUDGE).await;
        };

        let Some(key) = session.current_field() else {
            // All fields already collected; generation is in flight
            return Ok(());
        };

        if let Err(problem) = validate::validate_answer(key, answer) {
            return self
                .steps
                .send_message(chat_id, &format!("⚠️ {}", problem))
                .await;
        }

        session.record_answer(key, answer.trim());
        self.store.save(&session)?;

        if session.is_complete() {
            self.finalize(chat_id, &session).await
        } else {
            self.ask_next(chat_id, &session).await
        }
    }

    async fn ask_next(&self, chat_id: i64, session: &SessionState) -> Result<()> {
        if let Some(key) = session.current_field() {
            self.steps.send_message(chat_id, key.question()).await?;
        }
        Ok(())
    }

    /// Generate and deliver the letter, then clear the session whatever the
    /// outcome so the user can start over
    async fn finalize(&self, chat_id: i64, session: &SessionState) -> Result<()> {
        let outcome = self.deliver(chat_id, session).await;
        self.store.remove(chat_id)?;

        if let Err(e) = outcome {
            log::error!("Letter delivery failed for chat {}: {}", chat_id, e);
            let details: String = e.to_string().chars().take(200).collect();
            self.steps
                .send_message(
                    chat_id,
                    &format!(
                        "⚠️ Sorry, we encountered an error generating your letter.\n\
                        Technical details: {}\n\n\
                        Please try again or contact support.",
                        details
                    ),
                )
                .await?;
        }

        Ok(())
    }

    async fn deliver(&self, chat_id: i64, session: &SessionState) -> Result<()> {
        self.steps.send_typing(chat_id).await?;

        let letter = self.steps.generate_letter(&session.fields).await?;
        log::info!(
            "Letter for chat {} generated by provider '{}'",
            chat_id,
            letter.provider
        );

        self.steps
            .send_message(
                chat_id,
                &format!("✉️ Here's your application letter:\n\n{}", letter.text),
            )
            .await?;

        let full_name = session
            .fields
            .get(FieldKey::FullName)
            .unwrap_or("Application");
        let filename = format!("{}_Application.pdf", full_name.replace(' ', "_"));

        let pdf = self.steps.render_pdf(&letter.text, &filename).await?;
        self.steps
            .send_document(chat_id, &filename, pdf, "📄 PDF Version")
            .await
    }
}
