//! Letterbot Core Library
//!
//! Business logic for the job-application letter bot: configuration,
//! generation providers with retry/fallback, prompt building, the
//! conversation flow, session persistence and the external service clients.

pub mod clients;
pub mod config;
pub mod error;
pub mod flow;
pub mod providers;
pub mod services;
pub mod session;

// Re-export main types for easy access
pub use config::LetterBotConfig;
pub use error::{ErrorKind, GenerationError, LetterBotError, Result};

// Re-export client types
pub use clients::{PdfClient, TelegramClient};

// Re-export service types
pub use services::{BotProcessor, LetterService};

// Re-export flow types
pub use flow::{BotSteps, FlowHandler};

pub use session::SessionStore;
