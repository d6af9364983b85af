//! Conversation flow tests against a mock step implementation

use async_trait::async_trait;
use letterbot_core::error::{ErrorKind, GenerationError, Result};
use letterbot_core::flow::{BotSteps, FlowHandler};
use letterbot_core::services::{CLOSING, SALUTATION};
use letterbot_core::session::SessionStore;
use letterbot_types::{ApplicantFields, FieldKey, GeneratedLetter, ProviderName};
use std::sync::Mutex;
use tempfile::TempDir;

fn valid_letter() -> String {
    format!(
        "{},\n\nI am writing to apply for the role.\n\n{}\nAbebe Bikila",
        SALUTATION, CLOSING
    )
}

/// Valid answers in conversation order
const ANSWERS: [&str; 11] = [
    "Abebe Bikila",
    "Bole, Addis Ababa",
    "0912345678",
    "abebe@example.com",
    "Software Engineer",
    "Acme Corp",
    "3 years in backend development",
    "Cut API latency by 40%",
    "Rust, SQL, Docker",
    "LinkedIn",
    "Strong engineering culture",
];

#[derive(Default)]
struct MockSteps {
    messages: Mutex<Vec<String>>,
    documents: Mutex<Vec<String>>,
    generated_with: Mutex<Option<ApplicantFields>>,
    generation_error: Option<GenerationError>,
}

impl MockSteps {
    fn failing(error: GenerationError) -> Self {
        Self {
            generation_error: Some(error),
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl BotSteps for MockSteps {
    async fn send_message(&self, _chat_id: i64, text: &str) -> Result<()> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn send_typing(&self, _chat_id: i64) -> Result<()> {
        Ok(())
    }

    async fn send_document(
        &self,
        _chat_id: i64,
        filename: &str,
        data: Vec<u8>,
        _caption: &str,
    ) -> Result<()> {
        assert!(data.starts_with(b"%PDF"));
        self.documents.lock().unwrap().push(filename.to_string());
        Ok(())
    }

    async fn generate_letter(
        &self,
        fields: &ApplicantFields,
    ) -> std::result::Result<GeneratedLetter, GenerationError> {
        *self.generated_with.lock().unwrap() = Some(fields.clone());
        match &self.generation_error {
            Some(e) => Err(e.clone()),
            None => Ok(GeneratedLetter::new(valid_letter(), ProviderName::Gemini)),
        }
    }

    async fn render_pdf(&self, _letter_text: &str, _filename: &str) -> Result<Vec<u8>> {
        Ok(b"%PDF-1.4 fake".to_vec())
    }
}

fn handler_with(steps: MockSteps) -> (FlowHandler<MockSteps>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path()).unwrap();
    (FlowHandler::new(steps, store), dir)
}

#[tokio::test]
async fn start_command_sends_welcome_and_first_question() {
    let (handler, _dir) = handler_with(MockSteps::default());

    handler.handle_message(42, "/start").await.unwrap();

    let sent = handler_messages(&handler);
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("Welcome"));
    assert_eq!(sent[1], FieldKey::FullName.question());
}

#[tokio::test]
async fn message_before_start_gets_a_nudge() {
    let (handler, _dir) = handler_with(MockSteps::default());

    handler.handle_message(42, "hello there").await.unwrap();

    let sent = handler_messages(&handler);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("/start"));
}

#[tokio::test]
async fn invalid_answer_is_rejected_and_step_does_not_advance() {
    let (handler, _dir) = handler_with(MockSteps::default());

    handler.handle_message(42, "/start").await.unwrap();
    handler.handle_message(42, "Abebe").await.unwrap(); // one word, invalid
    handler.handle_message(42, "Abebe Bikila").await.unwrap();

    let sent = handler_messages(&handler);
    // welcome, question 1, warning, question 2
    assert_eq!(sent.len(), 4);
    assert!(sent[2].starts_with("⚠️"));
    assert_eq!(sent[3], FieldKey::Address.question());
}

#[tokio::test]
async fn reset_clears_the_session() {
    let (handler, _dir) = handler_with(MockSteps::default());

    handler.handle_message(42, "/start").await.unwrap();
    handler.handle_message(42, "Abebe Bikila").await.unwrap();
    handler.handle_message(42, "/reset").await.unwrap();
    handler.handle_message(42, "Bole, Addis Ababa").await.unwrap();

    let sent = handler_messages(&handler);
    // After reset the answer is treated as a message without a session
    assert!(sent.last().unwrap().contains("/start"));
}

#[tokio::test]
async fn completing_all_fields_delivers_letter_and_pdf() {
    let (handler, _dir) = handler_with(MockSteps::default());

    handler.handle_message(42, "/start").await.unwrap();
    for answer in ANSWERS {
        handler.handle_message(42, answer).await.unwrap();
    }

    let sent = handler_messages(&handler);
    let letter_message = sent
        .iter()
        .find(|m| m.contains("Here's your application letter"))
        .expect("letter text should be sent");
    assert!(letter_message.contains(SALUTATION));

    let docs = handler.steps().documents.lock().unwrap().clone();
    assert_eq!(docs, vec!["Abebe_Bikila_Application.pdf".to_string()]);

    // Fields handed to the generator contain every collected answer
    let fields = handler
        .steps()
        .generated_with
        .lock()
        .unwrap()
        .clone()
        .expect("generator should be called");
    assert!(fields.is_complete());
    assert_eq!(fields.get(FieldKey::Skills), Some("Rust, SQL, Docker"));
}

#[tokio::test]
async fn aggregate_failure_is_surfaced_and_session_cleared() {
    let error = GenerationError::new(
        ErrorKind::Quota,
        ProviderName::Gemini,
        "Quota exhausted. Please check billing",
    );
    let (handler, _dir) = handler_with(MockSteps::failing(error));

    handler.handle_message(42, "/start").await.unwrap();
    for answer in ANSWERS {
        handler.handle_message(42, answer).await.unwrap();
    }

    let sent = handler_messages(&handler);
    let failure = sent
        .iter()
        .find(|m| m.contains("error generating your letter"))
        .expect("failure message should be sent");
    assert!(failure.contains("Quota exhausted"));

    // Session was cleared, so the next message needs /start again
    handler.handle_message(42, "another message").await.unwrap();
    assert!(handler_messages(&handler).last().unwrap().contains("/start"));
}

fn handler_messages(handler: &FlowHandler<MockSteps>) -> Vec<String> {
    handler.steps().sent()
}
