//! Client modules for external services

pub mod pdf;
pub mod telegram;

// Re-export client types
pub use pdf::PdfClient;
pub use telegram::{TelegramChat, TelegramClient, TelegramMessage, TelegramUpdate};
