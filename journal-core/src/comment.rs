//! Comments attached to a manuscript. Weakly referenced by manuscript and
//! person identifier, never cascade-deleted with its manuscript — treated
//! as an audit trail that outlives the record it was made against.
//! limitation preserved from the source rather than guessed away).

use crate::error::JournalError;
use crate::ids::new_id;
use crate::store::{DocumentStore, Filter};
use crate::validation::require_non_blank;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const COLLECTION: &str = "comments";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub manuscript_id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

pub struct CommentRepository {
    store: Arc<dyn DocumentStore>,
}

impl CommentRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        manuscript_id: &str,
        author_id: &str,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Comment, JournalError> {
        require_non_blank("text", text)?;
        let comment = Comment {
            id: new_id(),
            manuscript_id: manuscript_id.to_string(),
            author_id: author_id.to_string(),
            text: text.to_string(),
            created_at,
        };
        self.store
            .insert(
                COLLECTION,
                serde_json::to_value(&comment).map_err(internal)?,
            )
            .await?;
        Ok(comment)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Comment>, JournalError> {
        let doc = self
            .store
            .find_one(COLLECTION, &Filter::new().eq("id", id))
            .await?;
        doc.map(from_doc).transpose()
    }

    pub async fn list_for_manuscript(
        &self,
        manuscript_id: &str,
    ) -> Result<Vec<Comment>, JournalError> {
        self.store
            .find(COLLECTION, &Filter::new().eq("manuscript_id", manuscript_id))
            .await?
            .into_iter()
            .map(from_doc)
            .collect()
    }

    pub async fn update_text(&self, id: &str, text: &str) -> Result<Comment, JournalError> {
        require_non_blank("text", text)?;
        let mut comment = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| JournalError::not_found(format!("comment {id}")))?;
        comment.text = text.to_string();

        let updated = self
            .store
            .update_one(
                COLLECTION,
                &Filter::new().eq("id", id),
                serde_json::to_value(&comment).map_err(internal)?,
            )
            .await?;
        if updated {
            Ok(comment)
        } else {
            Err(JournalError::not_found(format!("comment {id}")))
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), JournalError> {
        let deleted = self
            .store
            .delete_one(COLLECTION, &Filter::new().eq("id", id))
            .await?;
        if deleted {
            Ok(())
        } else {
            Err(JournalError::not_found(format!("comment {id}")))
        }
    }
}

fn from_doc(doc: serde_json::Value) -> Result<Comment, JournalError> {
    serde_json::from_value(doc).map_err(internal)
}

fn internal(e: serde_json::Error) -> JournalError {
    JournalError::Internal(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn repo() -> CommentRepository {
        CommentRepository::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn create_then_list_for_manuscript() {
        let repo = repo();
        repo.create("m1", "p1", "Looks good", Utc::now()).await.unwrap();
        let comments = repo.list_for_manuscript("m1").await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "Looks good");
    }

    #[tokio::test]
    async fn blank_text_rejected() {
        let repo = repo();
        let err = repo.create("m1", "p1", "   ", Utc::now()).await.unwrap_err();
        assert!(matches!(err, JournalError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn delete_is_independent_of_manuscript_lifecycle() {
        let repo = repo();
        let c = repo.create("m1", "p1", "text", Utc::now()).await.unwrap();
        repo.delete(&c.id).await.unwrap();
        assert!(repo.find_by_id(&c.id).await.unwrap().is_none());
    }
}
