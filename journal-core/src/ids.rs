//! Stable identifier generation and the duck-typed person lookup key.

use uuid::Uuid;

/// Generates a new time-ordered, globally unique identifier for a manuscript or person.
///
/// UUIDv7 embeds a millisecond timestamp, so identifiers sort roughly in creation
/// order — useful for audit trails without a separate sequence counter.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// A person may be looked up by stable ID or by email. The source code retries
/// an ID lookup and falls back to an email lookup on miss; here the two cases
/// are represented explicitly and resolved once at the store boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identifier {
    ById(String),
    ByEmail(String),
}

impl Identifier {
    /// Classifies a caller-supplied string as an email or a stable ID.
    ///
    /// Any string containing `@` is treated as an email; this is intentionally
    /// permissive here — [`crate::validation::is_valid_email`] is the
    /// authority on whether the email is actually well-formed.
    pub fn classify(raw: &str) -> Self {
        if raw.contains('@') {
            Identifier::ByEmail(raw.to_string())
        } else {
            Identifier::ById(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Identifier::ById(s) | Identifier::ByEmail(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_email_vs_id() {
        assert_eq!(
            Identifier::classify("a@b.com"),
            Identifier::ByEmail("a@b.com".to_string())
        );
        assert_eq!(
            Identifier::classify("018f1a2b-0000-7000-8000-000000000000"),
            Identifier::ById("018f1a2b-0000-7000-8000-000000000000".to_string())
        );
    }

    #[test]
    fn new_id_is_unique_and_nonempty() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }
}
