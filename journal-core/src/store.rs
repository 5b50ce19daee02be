//! Persistence trait for all journal state.
//!
//! The engine operates exclusively through this trait, enabling a pluggable
//! backend (`InMemoryStore` here; a real document database in production)
//! without the engine knowing the difference. Documents are opaque JSON
//! objects; callers supply an equality [`Filter`] over top-level fields, the
//! same shape a document database's `find`/`update`/`delete` would expect.

use crate::error::JournalError;
use async_trait::async_trait;
use serde_json::Value;

/// An equality filter over top-level document fields, e.g. `{"id": "..."}`.
#[derive(Clone, Debug, Default)]
pub struct Filter(pub Vec<(String, Value)>);

impl Filter {
    pub fn new() -> Self {
        Filter(Vec::new())
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.push((field.to_string(), value.into()));
        self
    }

    fn matches(&self, doc: &Value) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }
}

/// Thin adapter over an external document store, providing the collection
/// primitives a document store needs to provide: insert, find, update, delete by
/// filter. One collection per record kind (`people`, `manuscripts`, `texts`,
/// `comments`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, doc: Value) -> Result<(), JournalError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Value>, JournalError>;

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, JournalError>;

    /// Replaces the first document matching `filter` with `doc`. Returns
    /// whether a document was replaced.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        doc: Value,
    ) -> Result<bool, JournalError>;

    /// Deletes the first document matching `filter`. Returns whether one was deleted.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, JournalError>;

    /// Deletes every document matching `filter`. Returns the number deleted.
    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, JournalError>;
}

/// In-process implementation of [`DocumentStore`], used as the default
/// backend and in tests. An `RwLock`-guarded map per collection, mirroring
/// an in-process map behind a single lock.
pub struct InMemoryStore {
    collections: tokio::sync::RwLock<std::collections::HashMap<String, Vec<Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: tokio::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert(&self, collection: &str, doc: Value) -> Result<(), JournalError> {
        let mut w = self.collections.write().await;
        w.entry(collection.to_string()).or_default().push(doc);
        Ok(())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Value>, JournalError> {
        let r = self.collections.read().await;
        Ok(r.get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, JournalError> {
        let r = self.collections.read().await;
        Ok(r.get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.matches(d))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        doc: Value,
    ) -> Result<bool, JournalError> {
        let mut w = self.collections.write().await;
        if let Some(docs) = w.get_mut(collection) {
            if let Some(slot) = docs.iter_mut().find(|d| filter.matches(d)) {
                *slot = doc;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, JournalError> {
        let mut w = self.collections.write().await;
        if let Some(docs) = w.get_mut(collection) {
            if let Some(pos) = docs.iter().position(|d| filter.matches(d)) {
                docs.remove(pos);
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, JournalError> {
        let mut w = self.collections.write().await;
        if let Some(docs) = w.get_mut(collection) {
            let before = docs.len();
            docs.retain(|d| !filter.matches(d));
            return Ok((before - docs.len()) as u64);
        }
        Ok(0)
    }
}
