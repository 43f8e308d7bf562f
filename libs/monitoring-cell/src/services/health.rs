use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, instrument};

use shared_database::{AppState, DocumentStore};

use crate::models::HealthStatus;

pub struct HealthService {
    store: Arc<dyn DocumentStore>,
}

impl HealthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// `Ok` when the document store answers a ping, `Degraded` otherwise.
    #[instrument(skip(self))]
    pub async fn check(&self) -> HealthStatus {
        let start = Instant::now();

        match self.store.ping().await {
            Ok(()) => {
                debug!("Store ping succeeded in {}ms", start.elapsed().as_millis());
                HealthStatus::Ok
            }
            Err(e) => {
                error!("Store ping failed after {}ms: {}", start.elapsed().as_millis(), e);
                HealthStatus::Degraded
            }
        }
    }
}
