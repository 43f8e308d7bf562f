use std::sync::Arc;

use axum::{routing::get, Router};

use shared_database::AppState;

use crate::handlers::get_health_status;

/// Public liveness endpoint; no token required.
pub fn monitoring_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(get_health_status))
        .with_state(state)
}
