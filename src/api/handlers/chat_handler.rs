use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::chat_dto::*, handlers::resolve_current_user},
    error::AppError,
    security::auth::Claims,
};

/// 历史查询的条数上限
const HISTORY_LIMIT_MAX: usize = 100;
/// 历史查询的默认条数
const HISTORY_LIMIT_DEFAULT: usize = 50;

pub async fn get_chat_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<String>,
    Query(params): Query<ChatHistoryParams>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting chat history for session: {}", session_id);

    let limit = params
        .limit
        .unwrap_or(HISTORY_LIMIT_DEFAULT)
        .clamp(1, HISTORY_LIMIT_MAX);
    let skip = params.skip.unwrap_or(0);

    let user = resolve_current_user(&state, &claims).await?;
    let messages = state
        .chat_service
        .history(&user, &session_id, limit, skip)
        .await?;

    let message_responses: Vec<ChatMessageResponse> =
        messages.into_iter().map(ChatMessageResponse::from).collect();

    Ok(Json(ChatHistoryResponse {
        messages: message_responses,
        session_id,
    }))
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!(
        "Submitting turn for session: {} (reasoning: {})",
        session_id, request.reasoning
    );

    let user = resolve_current_user(&state, &claims).await?;
    let bot_message = state
        .chat_service
        .submit_turn(&user, &session_id, &request.content, request.reasoning)
        .await?;

    state.metrics.record_turn();
    if bot_message.model_used.as_deref() == Some("error") {
        state.metrics.record_model_degraded();
    }

    Ok((StatusCode::CREATED, Json(ChatMessageResponse::from(bot_message))))
}
