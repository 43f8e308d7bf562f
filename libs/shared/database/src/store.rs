use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use shared_models::error::AppError;

use crate::id::DocumentId;

/// A stored document. Its identifier lives under [`ID_FIELD`].
pub type Document = Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

pub const ID_FIELD: &str = "_id";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Database request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Database API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(_) => AppError::BadRequest("Invalid ID".to_string()),
            other => AppError::Database(other.to_string()),
        }
    }
}

/// Document-oriented persistence used by every cell.
///
/// Updates are last-writer-wins: there is no versioning, and two concurrent
/// writes to the same path may overwrite each other.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Checks that the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    async fn find_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<Document>>;

    /// First document whose top-level `field` equals `value`.
    async fn find_one(&self, collection: &str, field: &str, value: &Value) -> StoreResult<Option<Document>>;

    async fn count(&self, collection: &str, field: &str, value: &Value) -> StoreResult<u64>;

    /// Inserts a document under a freshly generated id and returns that id.
    async fn insert(&self, collection: &str, document: Document) -> StoreResult<DocumentId>;

    /// Overwrites the given top-level fields. Returns whether the document exists.
    async fn update_fields(&self, collection: &str, id: &DocumentId, fields: Document) -> StoreResult<bool>;

    /// Writes `value` at a nested object path, creating intermediate objects.
    /// Sibling keys along the path are left untouched.
    async fn set_path(&self, collection: &str, id: &DocumentId, path: &[&str], value: Value) -> StoreResult<bool>;

    /// Removes the key at a nested object path. Missing keys are not an error.
    async fn unset_path(&self, collection: &str, id: &DocumentId, path: &[&str]) -> StoreResult<bool>;

    async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<bool>;
}

pub(crate) fn set_in(document: &mut Document, path: &[&str], value: Value) -> StoreResult<()> {
    let (leaf, parents) = path
        .split_last()
        .ok_or_else(|| StoreError::InvalidPath("empty path".to_string()))?;

    let mut current = document;
    for key in parents {
        let entry = current
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = entry
            .as_object_mut()
            .ok_or_else(|| StoreError::InvalidPath(format!("'{}' is not an object", key)))?;
    }
    current.insert(leaf.to_string(), value);
    Ok(())
}

pub(crate) fn unset_in(document: &mut Document, path: &[&str]) -> StoreResult<()> {
    let (leaf, parents) = path
        .split_last()
        .ok_or_else(|| StoreError::InvalidPath("empty path".to_string()))?;

    let mut current = document;
    for key in parents {
        match current.get_mut(*key).and_then(Value::as_object_mut) {
            Some(next) => current = next,
            None => return Ok(()),
        }
    }
    current.remove(*leaf);
    Ok(())
}
