//! Shared field validators. Regexes are compiled once and reused.

use crate::error::JournalError;
use regex::Regex;
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._+-]*@[A-Za-z0-9][A-Za-z0-9.-]*\.[A-Za-z]{2,10}$")
            .expect("email pattern is a valid regex")
    })
}

/// Validates the ground-truth email shape for this system: alphanumeric first
/// character, no consecutive dots, exactly one `@`, an alphanumeric host with
/// optional dots/dashes, and a 2-10 letter TLD.
pub fn is_valid_email(email: &str) -> bool {
    !email.contains("..") && email_pattern().is_match(email)
}

pub fn require_valid_email(email: &str) -> Result<(), JournalError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(JournalError::invalid(format!("invalid email: {email}")))
    }
}

/// Rejects strings whose trimmed length is zero.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), JournalError> {
    if value.trim().is_empty() {
        Err(JournalError::invalid(format!("{field} must not be blank")))
    } else {
        Ok(())
    }
}
