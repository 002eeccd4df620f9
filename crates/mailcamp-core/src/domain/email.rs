use crate::error::CoreError;
use regex::Regex;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$";

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value.trim())
}

/// Canonical form of a contact email, rejecting anything that does not look
/// like `local@domain.tld`.
pub fn validate_email(value: &str) -> Result<String, CoreError> {
    match normalize_email(value) {
        Some(email) if is_valid_email(&email) => Ok(email),
        _ => Err(CoreError::InvalidEmail(value.trim().to_string())),
    }
}
