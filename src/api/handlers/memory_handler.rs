use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::memory_dto::*, handlers::resolve_current_user},
    error::AppError,
    models::memory::MemoType,
    security::auth::Claims,
    services::memory::MemoryPatch,
};

/// 解析类型过滤参数，未知取值是参数验证错误
fn parse_memo_type(value: &str) -> Result<MemoType, AppError> {
    MemoType::parse(value).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid memory type '{}'. Must be one of: core, environment",
            value
        ))
    })
}

pub async fn list_memories(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ListMemoriesParams>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Listing memories, filter: {:?}", params.memo_type);

    let memo_type = match params.memo_type.as_deref() {
        Some(value) => Some(parse_memo_type(value)?),
        None => None,
    };

    let user = resolve_current_user(&state, &claims).await?;
    let memories = state.memory_service.list(&user.id, memo_type).await?;

    let memory_responses: Vec<MemoryResponse> =
        memories.into_iter().map(MemoryResponse::from).collect();
    let total = memory_responses.len();

    Ok(Json(MemoryListResponse {
        memories: memory_responses,
        total,
    }))
}

pub async fn create_memory(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateMemoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Creating memory of type: {}", request.memo_type);

    let memo_type = parse_memo_type(&request.memo_type)?;
    let user = resolve_current_user(&state, &claims).await?;
    let memory = state
        .memory_service
        .create(&user.id, &request.content, memo_type)
        .await?;

    Ok((StatusCode::CREATED, Json(MemoryResponse::from(memory))))
}

pub async fn get_memory(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting memory: {}", id);

    let user = resolve_current_user(&state, &claims).await?;
    let memory = state.memory_service.get(&user.id, &id).await?;

    Ok(Json(MemoryResponse::from(memory)))
}

pub async fn update_memory(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(request): Json<UpdateMemoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Updating memory: {}", id);

    let memo_type = match request.memo_type.as_deref() {
        Some(value) => Some(parse_memo_type(value)?),
        None => None,
    };

    let user = resolve_current_user(&state, &claims).await?;
    let memory = state
        .memory_service
        .update(
            &user.id,
            &id,
            MemoryPatch {
                content: request.content,
                memo_type,
            },
        )
        .await?;

    Ok(Json(MemoryResponse::from(memory)))
}

pub async fn delete_memory(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Deleting memory: {}", id);

    let user = resolve_current_user(&state, &claims).await?;
    state.memory_service.delete(&user.id, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
