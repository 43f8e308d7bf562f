use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::id::DocumentId;
use crate::store::{set_in, unset_in, Document, DocumentStore, StoreError, StoreResult, ID_FIELD};

/// Document store backed by a PostgREST endpoint. Each collection is a table
/// keyed by `_id`; nested maps are JSON columns. The database name selects
/// the schema through the profile headers.
pub struct RestDocumentStore {
    client: Client,
    base_url: String,
    api_key: String,
    schema: String,
}

impl RestDocumentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.database_url.trim_end_matches('/').to_string(),
            api_key: config.database_api_key.clone(),
            schema: config.database_name.clone(),
        }
    }

    fn get_headers(&self, return_representation: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        if let Ok(schema) = HeaderValue::from_str(&self.schema) {
            headers.insert("Accept-Profile", schema.clone());
            headers.insert("Content-Profile", schema);
        }
        if return_representation {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        headers
    }

    async fn request(
        &self,
        method: Method,
        collection: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> StoreResult<Vec<Document>> {
        let url = format!("{}/rest/v1/{}", self.base_url, collection);
        debug!("Making {} request to {}", method, url);

        let returns_rows = method != Method::GET;
        let mut req = self.client
            .request(method, &url)
            .headers(self.get_headers(returns_rows))
            .query(query);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Database API error ({}): {}", status, error_text);
            return Err(StoreError::Api { status: status.as_u16(), message: error_text });
        }

        let rows = response.json::<Vec<Document>>().await?;
        Ok(rows)
    }

    fn id_filter(id: &DocumentId) -> Vec<(String, String)> {
        vec![(ID_FIELD.to_string(), format!("eq.{}", id))]
    }

    fn eq_filter(field: &str, value: &Value) -> (String, String) {
        let literal = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        (field.to_string(), format!("eq.{}", literal))
    }

    /// Reads the document, applies `mutate` locally and writes the touched
    /// top-level column back.
    async fn patch_path<F>(&self, collection: &str, id: &DocumentId, path: &[&str], mutate: F) -> StoreResult<bool>
    where
        F: FnOnce(&mut Document) -> StoreResult<()> + Send,
    {
        let root = path
            .first()
            .ok_or_else(|| StoreError::InvalidPath("empty path".to_string()))?;

        let mut document = match self.find_by_id(collection, id).await? {
            Some(document) => document,
            None => return Ok(false),
        };
        mutate(&mut document)?;

        let mut fields = Document::new();
        fields.insert(
            root.to_string(),
            document.remove(*root).unwrap_or(Value::Null),
        );
        self.update_fields(collection, id, fields).await
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn ping(&self) -> StoreResult<()> {
        let url = format!("{}/rest/v1/", self.base_url);
        let response = self.client
            .get(&url)
            .headers(self.get_headers(false))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!("status {}", response.status())))
        }
    }

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.request(Method::GET, collection, &[("select".to_string(), "*".to_string())], None)
            .await
    }

    async fn find_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<Document>> {
        let rows = self.request(Method::GET, collection, &Self::id_filter(id), None).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_one(&self, collection: &str, field: &str, value: &Value) -> StoreResult<Option<Document>> {
        let query = vec![
            Self::eq_filter(field, value),
            ("limit".to_string(), "1".to_string()),
        ];
        let rows = self.request(Method::GET, collection, &query, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn count(&self, collection: &str, field: &str, value: &Value) -> StoreResult<u64> {
        let query = vec![
            Self::eq_filter(field, value),
            ("select".to_string(), ID_FIELD.to_string()),
        ];
        let rows = self.request(Method::GET, collection, &query, None).await?;
        Ok(rows.len() as u64)
    }

    async fn insert(&self, collection: &str, mut document: Document) -> StoreResult<DocumentId> {
        let id = DocumentId::generate();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let rows = self.request(Method::POST, collection, &[], Some(Value::Object(document))).await?;
        if rows.is_empty() {
            return Err(StoreError::Api { status: 200, message: "insert returned no rows".to_string() });
        }

        debug!("Inserted document {} into {}", id, collection);
        Ok(id)
    }

    async fn update_fields(&self, collection: &str, id: &DocumentId, mut fields: Document) -> StoreResult<bool> {
        fields.remove(ID_FIELD);
        let rows = self
            .request(Method::PATCH, collection, &Self::id_filter(id), Some(Value::Object(fields)))
            .await?;
        Ok(!rows.is_empty())
    }

    async fn set_path(&self, collection: &str, id: &DocumentId, path: &[&str], value: Value) -> StoreResult<bool> {
        self.patch_path(collection, id, path, move |document| set_in(document, path, value))
            .await
    }

    async fn unset_path(&self, collection: &str, id: &DocumentId, path: &[&str]) -> StoreResult<bool> {
        if path.len() == 1 {
            let mut fields = Document::new();
            fields.insert(path[0].to_string(), Value::Null);
            return self.update_fields(collection, id, fields).await;
        }
        self.patch_path(collection, id, path, move |document| unset_in(document, path))
            .await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<bool> {
        let rows = self.request(Method::DELETE, collection, &Self::id_filter(id), None).await?;
        Ok(!rows.is_empty())
    }
}
