use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::session_dto::*, handlers::resolve_current_user},
    error::AppError,
    security::auth::Claims,
    services::session::SessionPatch,
};

pub async fn create_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Creating new session: {}", request.name);

    let user = resolve_current_user(&state, &claims).await?;
    let session = state.session_service.create(&user.id, &request.name).await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Listing sessions for subject: {}", claims.sub);

    let user = resolve_current_user(&state, &claims).await?;
    let sessions = state.session_service.list(&user.id).await?;

    let session_responses: Vec<SessionResponse> =
        sessions.into_iter().map(SessionResponse::from).collect();
    let total = session_responses.len();

    Ok(Json(SessionListResponse {
        sessions: session_responses,
        total,
    }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting session: {}", id);

    let user = resolve_current_user(&state, &claims).await?;
    let session = state.session_service.get(&user.id, &id).await?;

    Ok(Json(SessionResponse::from(session)))
}

pub async fn update_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Updating session: {}", id);

    let user = resolve_current_user(&state, &claims).await?;
    let session = state
        .session_service
        .update(&user.id, &id, SessionPatch { name: request.name })
        .await?;

    Ok(Json(SessionResponse::from(session)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Deleting session: {}", id);

    let user = resolve_current_user(&state, &claims).await?;
    state.session_service.delete(&user.id, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
