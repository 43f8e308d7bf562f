use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::id::DocumentId;
use crate::store::{set_in, unset_in, Document, DocumentStore, StoreError, StoreResult, ID_FIELD};

type Collection = BTreeMap<DocumentId, Document>;

/// Process-local document store. Ids sort by creation second, so listings
/// come back roughly in insertion order.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates losing the connection: every operation fails until restored.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is offline".to_string()));
        }
        Ok(())
    }

    async fn with_document<F>(&self, collection: &str, id: &DocumentId, mutate: F) -> StoreResult<bool>
    where
        F: FnOnce(&mut Document) -> StoreResult<()> + Send,
    {
        self.check_online()?;
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id));

        match document {
            Some(document) => {
                mutate(document)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check_online()
    }

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.check_online()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<Document>> {
        self.check_online()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn find_one(&self, collection: &str, field: &str, value: &Value) -> StoreResult<Option<Document>> {
        self.check_online()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.values().find(|doc| doc.get(field) == Some(value)))
            .cloned())
    }

    async fn count(&self, collection: &str, field: &str, value: &Value) -> StoreResult<u64> {
        self.check_online()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().filter(|doc| doc.get(field) == Some(value)).count() as u64)
            .unwrap_or(0))
    }

    async fn insert(&self, collection: &str, mut document: Document) -> StoreResult<DocumentId> {
        self.check_online()?;
        let id = DocumentId::generate();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), document);

        debug!("Inserted document {} into {}", id, collection);
        Ok(id)
    }

    async fn update_fields(&self, collection: &str, id: &DocumentId, fields: Document) -> StoreResult<bool> {
        self.with_document(collection, id, move |document| {
            for (key, value) in fields {
                if key != ID_FIELD {
                    document.insert(key, value);
                }
            }
            Ok(())
        })
        .await
    }

    async fn set_path(&self, collection: &str, id: &DocumentId, path: &[&str], value: Value) -> StoreResult<bool> {
        self.with_document(collection, id, move |document| set_in(document, path, value))
            .await
    }

    async fn unset_path(&self, collection: &str, id: &DocumentId, path: &[&str]) -> StoreResult<bool> {
        self.with_document(collection, id, move |document| unset_in(document, path))
            .await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<bool> {
        self.check_online()?;
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some();

        debug!("Delete {} from {}: {}", id, collection, removed);
        Ok(removed)
    }
}
