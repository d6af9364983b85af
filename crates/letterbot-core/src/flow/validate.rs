//! Per-field answer validation with user-facing re-prompt messages

use letterbot_types::FieldKey;
use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\+?251|0)?9\d{8}$").expect("valid phone regex"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Validate an answer for a field; Err carries the message sent back to the
/// user before re-asking the same question.
pub fn validate_answer(key: FieldKey, text: &str) -> Result<(), &'static str> {
    let text = text.trim();
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let char_len = text.chars().count();

    let (ok, problem) = match key {
        FieldKey::FullName => (
            text.split_whitespace().count() >= 2 && !has_digit,
            "Please enter your full name (first and last name, no numbers)",
        ),
        FieldKey::Address => (char_len >= 5, "Please enter a complete address"),
        FieldKey::Phone => (
            PHONE_RE.is_match(text),
            "Please enter a valid Ethiopian phone number (e.g., 0912345678 or +251912345678)",
        ),
        FieldKey::Email => (
            EMAIL_RE.is_match(text),
            "Please enter a valid email address (e.g., example@gmail.com)",
        ),
        FieldKey::JobTitle => (
            char_len >= 3 && !has_digit,
            "Please enter a valid job title (no numbers)",
        ),
        FieldKey::CompanyName => (
            char_len >= 2 && !has_digit,
            "Company name must be text only (no numbers)",
        ),
        FieldKey::Experience => (
            has_digit,
            "Please include years of experience (e.g., '2 years in programming')",
        ),
        FieldKey::Achievements => (
            char_len >= 10,
            "Please mention at least one achievement clearly",
        ),
        FieldKey::Skills => (
            text.split(',').filter(|s| !s.trim().is_empty()).count() >= 2,
            "Please enter at least 2 skills separated by commas",
        ),
        FieldKey::JobPlatform => (char_len >= 3, "Please specify where you found the job"),
        FieldKey::CompanyReason => (
            char_len >= 10,
            "Please explain why you want to join this company",
        ),
    };

    if ok {
        Ok(())
    } else {
        Err(problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_needs_two_words_without_digits() {
        assert!(validate_answer(FieldKey::FullName, "Abebe Bikila").is_ok());
        assert!(validate_answer(FieldKey::FullName, "Abebe").is_err());
        assert!(validate_answer(FieldKey::FullName, "Abebe B1kila").is_err());
    }

    #[test]
    fn phone_accepts_ethiopian_formats() {
        assert!(validate_answer(FieldKey::Phone, "0912345678").is_ok());
        assert!(validate_answer(FieldKey::Phone, "+251912345678").is_ok());
        assert!(validate_answer(FieldKey::Phone, "251912345678").is_ok());
        assert!(validate_answer(FieldKey::Phone, "912345678").is_ok());
        assert!(validate_answer(FieldKey::Phone, "12345").is_err());
        assert!(validate_answer(FieldKey::Phone, "0812345678").is_err());
    }

    #[test]
    fn email_requires_basic_shape() {
        assert!(validate_answer(FieldKey::Email, "a@b.com").is_ok());
        assert!(validate_answer(FieldKey::Email, "not-an-email").is_err());
        assert!(validate_answer(FieldKey::Email, "a@b").is_err());
    }

    #[test]
    fn experience_must_mention_a_number() {
        assert!(validate_answer(FieldKey::Experience, "3 years in programming").is_ok());
        assert!(validate_answer(FieldKey::Experience, "several years").is_err());
    }

    #[test]
    fn skills_need_at_least_two_entries() {
        assert!(validate_answer(FieldKey::Skills, "Rust, SQL").is_ok());
        assert!(validate_answer(FieldKey::Skills, "Rust, SQL, Docker").is_ok());
        assert!(validate_answer(FieldKey::Skills, "Rust").is_err());
        assert!(validate_answer(FieldKey::Skills, "Rust, ").is_err());
    }

    #[test]
    fn free_text_fields_enforce_minimum_length() {
        assert!(validate_answer(FieldKey::Address, "Bole, Addis Ababa").is_ok());
        assert!(validate_answer(FieldKey::Address, "Bole").is_err());
        assert!(validate_answer(FieldKey::Achievements, "Cut API latency by 40%").is_ok());
        assert!(validate_answer(FieldKey::Achievements, "stuff").is_err());
        assert!(validate_answer(FieldKey::CompanyReason, "Strong engineering culture").is_ok());
        assert!(validate_answer(FieldKey::CompanyReason, "why not").is_err());
    }

    #[test]
    fn names_and_titles_reject_digits() {
        assert!(validate_answer(FieldKey::JobTitle, "Software Engineer").is_ok());
        assert!(validate_answer(FieldKey::JobTitle, "Engineer 2").is_err());
        assert!(validate_answer(FieldKey::CompanyName, "Acme Corp").is_ok());
        assert!(validate_answer(FieldKey::CompanyName, "Acme 99").is_err());
    }
}
