use std::sync::Arc;

use axum::{
    Router,
    routing::post,
};

use shared_database::AppState;

use crate::handlers;

pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/cadastro", post(handlers::register))
        .route("/login", post(handlers::login))
        .with_state(state)
}
