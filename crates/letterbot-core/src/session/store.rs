//! File-backed session store, one JSON file per chat.
//!
//! Replaces process-global session maps with an explicit store keyed by
//! chat id; sessions survive a bot restart mid-conversation.

use crate::error::{LetterBotError, Result};
use letterbot_types::SessionState;
use std::fs;
use std::path::{Path, PathBuf};

pub struct SessionStore {
    root_path: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at `root_path`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(root_path: P) -> Result<Self> {
        let root_path = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root_path)?;

        Ok(Self { root_path })
    }

    fn session_path(&self, chat_id: i64) -> PathBuf {
        self.root_path.join(format!("session_{}.json", chat_id))
    }

    /// Load the session for a chat, None if no conversation is in progress
    pub fn load(&self, chat_id: i64) -> Result<Option<SessionState>> {
        let path = self.session_path(chat_id);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let session = serde_json::from_str(&json).map_err(|e| {
            LetterBotError::Deserialization(format!(
                "Failed to deserialize session for chat {}: {}",
                chat_id, e
            ))
        })?;

        Ok(Some(session))
    }

    /// Write the session state for its chat
    pub fn save(&self, session: &SessionState) -> Result<()> {
        let json = serde_json::to_string_pretty(session).map_err(|e| {
            LetterBotError::Serialization(format!("Failed to serialize session: {}", e))
        })?;

        fs::write(self.session_path(session.chat_id), json)?;
        Ok(())
    }

    /// Remove a chat's session; missing files are not an error
    pub fn remove(&self, chat_id: i64) -> Result<()> {
        let path = self.session_path(chat_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
