use std::sync::Arc;

use axum::{extract::State, Json};

use shared_database::AppState;
use shared_models::error::AppError;
use shared_utils::extractor::ValidatedJson;

use crate::models::{AssistantError, ChatRequest, ChatResponse};
use crate::services::Assistant;

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = request
        .mensagem
        .filter(|m| !m.trim().is_empty())
        .ok_or(AssistantError::EmptyMessage)?;

    let assistant = Assistant::from_config(&state.config)?;
    let resposta = assistant.reply(&message).await;

    Ok(Json(ChatResponse { resposta }))
}

pub async fn get_help() -> Json<ChatResponse> {
    Json(ChatResponse {
        resposta: Assistant::help_text().to_string(),
    })
}
