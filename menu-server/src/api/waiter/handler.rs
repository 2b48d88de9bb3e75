//! Waiter API Handlers

use axum::{Json, extract::State};
use shared::chat::{ChatMessage, ChatReply, ChatRequest};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult};

/// Longest accepted guest message, in characters
const MAX_MESSAGE_CHARS: usize = 500;

/// POST /api/waiter/messages
///
/// Model failures are not HTTP errors: the reply carries the fallback text
/// and `answered: false`.
pub async fn send(
    State(state): State<ServerState>,
    Json(payload): Json<ChatRequest>,
) -> AppResult<ApiResponse<ChatReply>> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::validation("message must not be empty"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::validation(format!(
            "message exceeds {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(ApiResponse::success(state.waiter.reply(message).await))
}

/// GET /api/waiter/messages
pub async fn history(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<ChatMessage>>> {
    Ok(ApiResponse::success(state.waiter.history().await))
}

/// DELETE /api/waiter/messages
pub async fn reset(State(state): State<ServerState>) -> AppResult<ApiResponse<()>> {
    state.waiter.reset().await;
    Ok(ApiResponse::ok())
}
