//! Shared types for the letter bot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The fixed set of applicant fields collected by the conversation flow,
/// in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    FullName,
    Address,
    Phone,
    Email,
    JobTitle,
    CompanyName,
    Experience,
    Achievements,
    Skills,
    JobPlatform,
    CompanyReason,
}

impl FieldKey {
    /// All fields in conversation order
    pub const ALL: [FieldKey; 11] = [
        FieldKey::FullName,
        FieldKey::Address,
        FieldKey::Phone,
        FieldKey::Email,
        FieldKey::JobTitle,
        FieldKey::CompanyName,
        FieldKey::Experience,
        FieldKey::Achievements,
        FieldKey::Skills,
        FieldKey::JobPlatform,
        FieldKey::CompanyReason,
    ];

    /// Label used when embedding the field into the generation prompt
    pub fn label(&self) -> &'static str {
        match self {
            FieldKey::FullName => "Name",
            FieldKey::Address => "Address",
            FieldKey::Phone => "Phone",
            FieldKey::Email => "Email",
            FieldKey::JobTitle => "Applying for",
            FieldKey::CompanyName => "Company",
            FieldKey::Experience => "Experience",
            FieldKey::Achievements => "Achievements",
            FieldKey::Skills => "Skills",
            FieldKey::JobPlatform => "Found on",
            FieldKey::CompanyReason => "Reason for applying",
        }
    }

    /// Question asked in the chat for this field
    pub fn question(&self) -> &'static str {
        match self {
            FieldKey::FullName => "📝 What is your *full name*?",
            FieldKey::Address => "🏠 What is your *address*?",
            FieldKey::Phone => "📱 What is your *phone number*?",
            FieldKey::Email => "📧 What is your *email address*?",
            FieldKey::JobTitle => "💼 What *job title* are you applying for?",
            FieldKey::CompanyName => "🏢 What is the *company name*?",
            FieldKey::Experience => "⌛ How many years of experience and in what field?",
            FieldKey::Achievements => "🏆 Mention 1-2 achievements (with numbers if possible):",
            FieldKey::Skills => "🛠️ List your top 3-5 skills:",
            FieldKey::JobPlatform => "🌐 Where did you find the job (e.g., LinkedIn, Effoysira)?",
            FieldKey::CompanyReason => "💡 Why do you want to work for this company?",
        }
    }
}

/// Ordered mapping from applicant field to the collected free-text answer.
///
/// Created incrementally by the conversation flow and consumed, never
/// mutated, by the prompt builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantFields {
    values: BTreeMap<FieldKey, String>,
}

impl ApplicantFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FieldKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// True once every field has an entry (values may still be empty strings
    /// for optional answers)
    pub fn is_complete(&self) -> bool {
        FieldKey::ALL.iter().all(|k| self.values.contains_key(k))
    }

    /// Iterate fields in conversation order, skipping unanswered ones
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        FieldKey::ALL
            .iter()
            .filter_map(move |k| self.values.get(k).map(|v| (*k, v.as_str())))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Named text-generation provider integrations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderName {
    Gemini,
    OpenAi,
    Groq,
    HuggingFace,
}

impl ProviderName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderName::Gemini => "gemini",
            ProviderName::OpenAi => "openai",
            ProviderName::Groq => "groq",
            ProviderName::HuggingFace => "huggingface",
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderName::Gemini),
            "openai" => Ok(ProviderName::OpenAi),
            "groq" => Ok(ProviderName::Groq),
            "huggingface" => Ok(ProviderName::HuggingFace),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// A validated letter produced by one of the configured providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedLetter {
    pub text: String,
    pub provider: ProviderName,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedLetter {
    pub fn new(text: String, provider: ProviderName) -> Self {
        Self {
            text,
            provider,
            generated_at: Utc::now(),
        }
    }
}

/// Per-chat conversation state, persisted between messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub chat_id: i64,
    pub step: usize,
    pub fields: ApplicantFields,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(chat_id: i64) -> Self {
        let now = Utc::now();
        Self {
            chat_id,
            step: 0,
            fields: ApplicantFields::new(),
            started_at: now,
            updated_at: now,
        }
    }

    /// Field the bot is currently waiting for, None once all are collected
    pub fn current_field(&self) -> Option<FieldKey> {
        FieldKey::ALL.get(self.step).copied()
    }

    /// Store an answer for the current field and advance to the next step
    pub fn record_answer(&mut self, key: FieldKey, answer: impl Into<String>) {
        self.fields.insert(key, answer);
        self.step += 1;
        self.updated_at = Utc::now();
    }

    pub fn is_complete(&self) -> bool {
        self.step >= FieldKey::ALL.len() && self.fields.is_complete()
    }
}
