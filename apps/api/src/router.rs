use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use assistant_cell::assistant_routes;
use auth_cell::auth_routes;
use doctor_cell::doctor_routes;
use monitoring_cell::monitoring_routes;
use patient_cell::patient_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .merge(monitoring_routes(state.clone()))
        .merge(auth_routes(state.clone()))
        .nest("/medicos", doctor_routes(state.clone()))
        .nest("/pacientes", patient_routes(state.clone()))
        .nest("/assistente", assistant_routes(state))
}
