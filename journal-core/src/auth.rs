//! Authentication collaborator. The concrete comparison algorithm here is an
//! explicit stub — production deployments must swap in real password hashing
//! (argon2/bcrypt); this crate only gives the opaque shape credential
//! verification is delegated through.

use crate::error::JournalError;
use crate::person::PersonRepository;
use crate::roles::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// An opaque credential. Never serialized out of the engine, never logged.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        Credential(raw.into())
    }

    /// Constant-time equality, to avoid leaking credential length/content
    /// through early-exit comparison timing.
    fn matches(&self, candidate: &str) -> bool {
        let a = self.0.as_bytes();
        let b = candidate.as_bytes();
        if a.len() != b.len() {
            return false;
        }
        let mut diff = 0u8;
        for (x, y) in a.iter().zip(b.iter()) {
            diff |= x ^ y;
        }
        diff == 0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Registers and authenticates persons. A thin adapter so the HTTP layer
/// never touches `PersonRepository` directly for credential flows.
pub struct AuthGate {
    people: Arc<PersonRepository>,
}

impl AuthGate {
    pub fn new(people: Arc<PersonRepository>) -> Self {
        Self { people }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, JournalError> {
        let person = self
            .people
            .create(
                name,
                "",
                email,
                BTreeSet::from([Role::Author]),
                None,
                Some(Credential::new(password)),
            )
            .await?;
        Ok(person.id)
    }

    /// Login failures are indistinguishable whether the identifier doesn't
    /// resolve or the password is wrong, both surface as `Unauthenticated`.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<String, JournalError> {
        let person = self
            .people
            .resolve(&crate::ids::Identifier::classify(identifier))
            .await?
            .ok_or(JournalError::Unauthenticated)?;

        match &person.credential {
            Some(cred) if cred.matches(password) => Ok(person.id),
            _ => Err(JournalError::Unauthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn gate() -> AuthGate {
        AuthGate::new(Arc::new(PersonRepository::new(Arc::new(InMemoryStore::new()))))
    }

    #[tokio::test]
    async fn register_then_login_succeeds() {
        let gate = gate();
        let id = gate
            .register("Grace Hopper", "grace@example.com", "hunter2")
            .await
            .unwrap();
        let logged_in = gate.login("grace@example.com", "hunter2").await.unwrap();
        assert_eq!(id, logged_in);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthenticated() {
        let gate = gate();
        gate.register("G", "g2@example.com", "correct").await.unwrap();
        let err = gate.login("g2@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, JournalError::Unauthenticated));
    }

    #[tokio::test]
    async fn unknown_user_is_unauthenticated_not_not_found() {
        let gate = gate();
        let err = gate.login("ghost@example.com", "x").await.unwrap_err();
        assert!(matches!(err, JournalError::Unauthenticated));
    }
}
