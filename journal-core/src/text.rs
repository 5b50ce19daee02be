//! Per-manuscript text pages. Owned exclusively by their manuscript: cascade
//! deleted when the manuscript is deleted.

use crate::error::JournalError;
use crate::store::{DocumentStore, Filter};
use crate::validation::require_non_blank;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const COLLECTION: &str = "texts";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TextPage {
    pub manuscript_id: String,
    pub page: String,
    pub title: String,
    pub body: String,
}

pub struct TextRepository {
    store: Arc<dyn DocumentStore>,
}

impl TextRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates the auto-generated page "1" from a manuscript's initial
    /// submission body, bypassing the duplicate check a caller-initiated
    /// create would hit (there cannot be an existing page "1" yet).
    pub async fn create_initial_page(
        &self,
        manuscript_id: &str,
        title: &str,
        body: &str,
    ) -> Result<TextPage, JournalError> {
        let page = TextPage {
            manuscript_id: manuscript_id.to_string(),
            page: "1".to_string(),
            title: title.to_string(),
            body: body.to_string(),
        };
        self.store
            .insert(COLLECTION, serde_json::to_value(&page).map_err(internal)?)
            .await?;
        Ok(page)
    }

    pub async fn create(
        &self,
        manuscript_id: &str,
        page_number: &str,
        title: &str,
        body: &str,
    ) -> Result<TextPage, JournalError> {
        require_non_blank("page", page_number)?;
        require_non_blank("body", body)?;

        if self.find(manuscript_id, page_number).await?.is_some() {
            return Err(JournalError::conflict(format!(
                "page {page_number} already exists for manuscript {manuscript_id}"
            )));
        }

        let page = TextPage {
            manuscript_id: manuscript_id.to_string(),
            page: page_number.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        };
        self.store
            .insert(COLLECTION, serde_json::to_value(&page).map_err(internal)?)
            .await?;
        Ok(page)
    }

    pub async fn find(
        &self,
        manuscript_id: &str,
        page_number: &str,
    ) -> Result<Option<TextPage>, JournalError> {
        let doc = self
            .store
            .find_one(
                COLLECTION,
                &Filter::new()
                    .eq("manuscript_id", manuscript_id)
                    .eq("page", page_number),
            )
            .await?;
        doc.map(from_doc).transpose()
    }

    /// Pages are listed sorted lexicographically by page-number string
    /// an explicit resolution of what the distilled spec left open).
    pub async fn list(&self, manuscript_id: &str) -> Result<Vec<TextPage>, JournalError> {
        let mut pages: Vec<TextPage> = self
            .store
            .find(COLLECTION, &Filter::new().eq("manuscript_id", manuscript_id))
            .await?
            .into_iter()
            .map(from_doc)
            .collect::<Result<_, _>>()?;
        pages.sort_by(|a, b| a.page.cmp(&b.page));
        Ok(pages)
    }

    pub async fn update(
        &self,
        manuscript_id: &str,
        page_number: &str,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<TextPage, JournalError> {
        let mut page = self
            .find(manuscript_id, page_number)
            .await?
            .ok_or_else(|| JournalError::not_found(format!("page {page_number}")))?;

        if let Some(title) = title {
            page.title = title;
        }
        if let Some(body) = body {
            require_non_blank("body", &body)?;
            page.body = body;
        }

        let updated = self
            .store
            .update_one(
                COLLECTION,
                &Filter::new()
                    .eq("manuscript_id", manuscript_id)
                    .eq("page", page_number),
                serde_json::to_value(&page).map_err(internal)?,
            )
            .await?;
        if updated {
            Ok(page)
        } else {
            Err(JournalError::not_found(format!("page {page_number}")))
        }
    }

    pub async fn delete(&self, manuscript_id: &str, page_number: &str) -> Result<(), JournalError> {
        let deleted = self
            .store
            .delete_one(
                COLLECTION,
                &Filter::new()
                    .eq("manuscript_id", manuscript_id)
                    .eq("page", page_number),
            )
            .await?;
        if deleted {
            Ok(())
        } else {
            Err(JournalError::not_found(format!("page {page_number}")))
        }
    }

    /// Cascade delete: removes every page belonging to `manuscript_id`.
    pub async fn delete_for_manuscript(&self, manuscript_id: &str) -> Result<u64, JournalError> {
        self.store
            .delete_many(COLLECTION, &Filter::new().eq("manuscript_id", manuscript_id))
            .await
    }
}

fn from_doc(doc: serde_json::Value) -> Result<TextPage, JournalError> {
    serde_json::from_value(doc).map_err(internal)
}

fn internal(e: serde_json::Error) -> JournalError {
    JournalError::Internal(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn repo() -> TextRepository {
        TextRepository::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn create_rejects_duplicate_page_number() {
        let repo = repo();
        repo.create("m1", "2", "T", "body").await.unwrap();
        let err = repo.create("m1", "2", "T2", "other").await.unwrap_err();
        assert!(matches!(err, JournalError::Conflict(_)));
    }

    #[tokio::test]
    async fn list_sorts_lexicographically() {
        let repo = repo();
        repo.create_initial_page("m1", "Intro", "body 1").await.unwrap();
        repo.create("m1", "10", "T10", "body 10").await.unwrap();
        repo.create("m1", "2", "T2", "body 2").await.unwrap();
        let pages = repo.list("m1").await.unwrap();
        let numbers: Vec<&str> = pages.iter().map(|p| p.page.as_str()).collect();
        assert_eq!(numbers, vec!["1", "10", "2"]);
    }

    #[tokio::test]
    async fn cascade_delete_removes_all_pages_for_manuscript() {
        let repo = repo();
        repo.create_initial_page("m1", "Intro", "body").await.unwrap();
        repo.create("m1", "2", "T2", "body 2").await.unwrap();
        repo.create("m2", "1", "Other", "body").await.unwrap();

        let removed = repo.delete_for_manuscript("m1").await.unwrap();
        assert_eq!(removed, 2);
        assert!(repo.list("m1").await.unwrap().is_empty());
        assert_eq!(repo.list("m2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_requires_existence() {
        let repo = repo();
        let err = repo
            .update("m1", "9", Some("T".into()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::NotFound(_)));
    }
}
