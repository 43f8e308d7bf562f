use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_database::AppState;
use shared_models::auth::{Credentials, TokenResponse};
use shared_models::error::AppError;
use shared_utils::extractor::ValidatedJson;

use crate::services::UserService;

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = UserService::new(&state);

    let id = service
        .register(credentials.username.as_deref(), credentials.password.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(json!({
        "message": "User created successfully",
        "id": id
    }))))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Login attempt");
    let service = UserService::new(&state);

    let token = service
        .login(
            credentials.username.as_deref(),
            credentials.password.as_deref(),
            &state.config.jwt_secret,
            state.config.token_ttl_hours,
        )
        .await?;

    Ok(Json(TokenResponse { token }))
}
