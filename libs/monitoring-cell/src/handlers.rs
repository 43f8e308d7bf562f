use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use shared_database::AppState;

use crate::models::{HealthResponse, HealthStatus};
use crate::services::HealthService;

pub async fn get_health_status(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let status = HealthService::new(&state).check().await;

    let code = match status {
        HealthStatus::Ok => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (code, Json(HealthResponse { status }))
}
