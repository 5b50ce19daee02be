//! Person records and the person collection repository.

use crate::auth::Credential;
use crate::error::JournalError;
use crate::ids::{new_id, Identifier};
use crate::roles::Role;
use crate::store::{DocumentStore, Filter};
use crate::validation::{require_non_blank, require_valid_email};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

const COLLECTION: &str = "people";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub affiliation: String,
    pub email: String,
    pub roles: BTreeSet<Role>,
    pub bio: Option<String>,
    #[serde(default)]
    pub credential: Option<Credential>,
}

/// The shape a `Person` takes once it leaves this crate: identical to
/// `Person` minus `credential`, which must never cross the HTTP boundary.
/// `Person` itself keeps `credential` so it round-trips through the
/// document store; only response serialization goes through this type.
#[derive(Clone, Debug, Serialize)]
pub struct PersonView {
    pub id: String,
    pub name: String,
    pub affiliation: String,
    pub email: String,
    pub roles: BTreeSet<Role>,
    pub bio: Option<String>,
}

impl From<Person> for PersonView {
    fn from(p: Person) -> Self {
        PersonView {
            id: p.id,
            name: p.name,
            affiliation: p.affiliation,
            email: p.email,
            roles: p.roles,
            bio: p.bio,
        }
    }
}

/// What the masthead page shows for an editorial staff member. Chosen over
/// the alternative `{name, email, roles}` shape because it never leaks an
/// email address on a public endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct MastheadEntry {
    pub name: String,
    pub affiliation: String,
    pub bio: Option<String>,
}

pub struct PersonRepository {
    store: Arc<dyn DocumentStore>,
}

impl PersonRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        name: &str,
        affiliation: &str,
        email: &str,
        roles: BTreeSet<Role>,
        bio: Option<String>,
        credential: Option<Credential>,
    ) -> Result<Person, JournalError> {
        require_non_blank("name", name)?;
        require_valid_email(email)?;

        if self.find_by_email(email).await?.is_some() {
            return Err(JournalError::conflict("email already registered"));
        }

        let person = Person {
            id: new_id(),
            name: name.to_string(),
            affiliation: affiliation.to_string(),
            email: email.to_string(),
            roles,
            bio,
            credential,
        };
        self.store
            .insert(COLLECTION, serde_json::to_value(&person).map_err(internal)?)
            .await?;
        Ok(person)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Person>, JournalError> {
        let doc = self
            .store
            .find_one(COLLECTION, &Filter::new().eq("id", id))
            .await?;
        doc.map(from_doc).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Person>, JournalError> {
        let doc = self
            .store
            .find_one(COLLECTION, &Filter::new().eq("email", email))
            .await?;
        doc.map(from_doc).transpose()
    }

    /// Resolves either a stable ID or an email, trying ID first.
    pub async fn resolve(&self, identifier: &Identifier) -> Result<Option<Person>, JournalError> {
        match identifier {
            Identifier::ById(id) => {
                if let Some(p) = self.find_by_id(id).await? {
                    return Ok(Some(p));
                }
                self.find_by_email(id).await
            }
            Identifier::ByEmail(email) => self.find_by_email(email).await,
        }
    }

    pub async fn list(&self) -> Result<Vec<Person>, JournalError> {
        self.store
            .find(COLLECTION, &Filter::new())
            .await?
            .into_iter()
            .map(from_doc)
            .collect()
    }

    pub async fn masthead(&self) -> Result<Vec<MastheadEntry>, JournalError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|p| p.roles.iter().any(|r| r.is_masthead()))
            .map(|p| MastheadEntry {
                name: p.name,
                affiliation: p.affiliation,
                bio: p.bio,
            })
            .collect())
    }

    pub async fn update(
        &self,
        id: &str,
        name: Option<String>,
        affiliation: Option<String>,
        bio: Option<String>,
    ) -> Result<Person, JournalError> {
        let mut person = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| JournalError::not_found(format!("person {id}")))?;

        if let Some(name) = name {
            require_non_blank("name", &name)?;
            person.name = name;
        }
        if let Some(affiliation) = affiliation {
            person.affiliation = affiliation;
        }
        if bio.is_some() {
            person.bio = bio;
        }

        self.replace(&person).await?;
        Ok(person)
    }

    pub async fn delete(&self, id: &str) -> Result<(), JournalError> {
        let deleted = self
            .store
            .delete_one(COLLECTION, &Filter::new().eq("id", id))
            .await?;
        if deleted {
            Ok(())
        } else {
            Err(JournalError::not_found(format!("person {id}")))
        }
    }

    pub async fn add_role(&self, id: &str, role: Role) -> Result<Person, JournalError> {
        let mut person = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| JournalError::not_found(format!("person {id}")))?;
        if !person.roles.insert(role) {
            return Err(JournalError::invalid(format!(
                "person already holds role {}",
                role.code()
            )));
        }
        self.replace(&person).await?;
        Ok(person)
    }

    pub async fn delete_role(&self, id: &str, role: Role) -> Result<Person, JournalError> {
        let mut person = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| JournalError::not_found(format!("person {id}")))?;
        if !person.roles.remove(&role) {
            return Err(JournalError::invalid(format!(
                "person does not hold role {}",
                role.code()
            )));
        }
        self.replace(&person).await?;
        Ok(person)
    }

    async fn replace(&self, person: &Person) -> Result<(), JournalError> {
        let updated = self
            .store
            .update_one(
                COLLECTION,
                &Filter::new().eq("id", person.id.clone()),
                serde_json::to_value(person).map_err(internal)?,
            )
            .await?;
        if updated {
            Ok(())
        } else {
            Err(JournalError::not_found(format!("person {}", person.id)))
        }
    }
}

fn from_doc(doc: serde_json::Value) -> Result<Person, JournalError> {
    serde_json::from_value(doc).map_err(internal)
}

fn internal(e: serde_json::Error) -> JournalError {
    JournalError::Internal(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn repo() -> PersonRepository {
        PersonRepository::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn create_then_read_round_trips() {
        let repo = repo();
        let created = repo
            .create("Ada Lovelace", "Analytical Engines", "ada@example.com", BTreeSet::new(), None, None)
            .await
            .unwrap();
        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.email, "ada@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let repo = repo();
        repo.create("A", "X", "dup@example.com", BTreeSet::new(), None, None)
            .await
            .unwrap();
        let err = repo
            .create("B", "Y", "dup@example.com", BTreeSet::new(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Conflict(_)));
    }

    #[tokio::test]
    async fn add_role_then_delete_role_is_idempotent_round_trip() {
        let repo = repo();
        let p = repo
            .create("R", "Y", "r@example.com", BTreeSet::new(), None, None)
            .await
            .unwrap();
        repo.add_role(&p.id, Role::Referee).await.unwrap();
        repo.delete_role(&p.id, Role::Referee).await.unwrap();
        let after = repo.find_by_id(&p.id).await.unwrap().unwrap();
        assert!(after.roles.is_empty());
    }

    #[tokio::test]
    async fn adding_same_role_twice_fails() {
        let repo = repo();
        let p = repo
            .create("R", "Y", "r2@example.com", BTreeSet::new(), None, None)
            .await
            .unwrap();
        repo.add_role(&p.id, Role::Referee).await.unwrap();
        let err = repo.add_role(&p.id, Role::Referee).await.unwrap_err();
        assert!(matches!(err, JournalError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn masthead_includes_only_editorial_roles() {
        let repo = repo();
        let mut editor_roles = BTreeSet::new();
        editor_roles.insert(Role::Editor);
        repo.create("Ed", "J", "ed@example.com", editor_roles, None, None)
            .await
            .unwrap();
        repo.create("Au", "J", "au@example.com", BTreeSet::new(), None, None)
            .await
            .unwrap();
        let masthead = repo.masthead().await.unwrap();
        assert_eq!(masthead.len(), 1);
        assert_eq!(masthead[0].name, "Ed");
    }

    #[tokio::test]
    async fn credential_survives_a_store_round_trip() {
        let repo = repo();
        repo.create(
            "C",
            "Y",
            "c@example.com",
            BTreeSet::new(),
            None,
            Some(Credential::new("s3cret")),
        )
        .await
        .unwrap();
        let reloaded = repo.find_by_email("c@example.com").await.unwrap().unwrap();
        assert!(reloaded.credential.is_some());
    }

    #[tokio::test]
    async fn view_omits_credential() {
        let repo = repo();
        let created = repo
            .create(
                "V",
                "Y",
                "v@example.com",
                BTreeSet::new(),
                None,
                Some(Credential::new("s3cret")),
            )
            .await
            .unwrap();
        let view = serde_json::to_value(PersonView::from(created)).unwrap();
        assert!(view.get("credential").is_none());
    }

    #[tokio::test]
    async fn resolve_falls_back_from_id_to_email() {
        let repo = repo();
        repo.create("E", "J", "e@example.com", BTreeSet::new(), None, None)
            .await
            .unwrap();
        let found = repo
            .resolve(&Identifier::classify("e@example.com"))
            .await
            .unwrap();
        assert!(found.is_some());
    }
}
