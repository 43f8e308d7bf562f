use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_database::AppState;

use crate::handlers;

/// Public chatbot endpoints; replies need `GOOGLE_API_KEY` to be set.
pub fn assistant_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/mensagem", post(handlers::send_message))
        .route("/ajuda", get(handlers::get_help))
        .with_state(state)
}
