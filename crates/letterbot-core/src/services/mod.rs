//! Service modules for business logic

pub mod bot_processor;
pub mod letter_service;
pub mod prompt;

// Re-export service types
pub use bot_processor::BotProcessor;
pub use letter_service::LetterService;
pub use prompt::{build_prompt, validate_format, GenerationRequest, CLOSING, SALUTATION};
