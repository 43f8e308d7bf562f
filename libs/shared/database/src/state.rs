use std::sync::Arc;

use tracing::info;

use shared_config::AppConfig;

use crate::memory::InMemoryStore;
use crate::rest::RestDocumentStore;
use crate::store::DocumentStore;

/// Router state shared by every cell: configuration plus the store handle.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    pub fn from_config(config: AppConfig) -> Self {
        let store = connect(&config);
        Self { config, store }
    }
}

pub fn connect(config: &AppConfig) -> Arc<dyn DocumentStore> {
    if config.uses_memory_store() {
        info!("Using in-memory document store");
        Arc::new(InMemoryStore::new())
    } else {
        info!("Using REST document store at {} (schema {})", config.database_url, config.database_name);
        Arc::new(RestDocumentStore::new(config))
    }
}
