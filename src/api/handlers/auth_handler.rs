use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::auth_dto::*, dto::user_dto::UserResponse},
    error::AppError,
    services::account::Registration,
};

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Registering new user: {}", request.username);

    let user = state
        .account_service
        .register(Registration {
            username: request.username,
            email: request.email,
            full_name: request.full_name,
            password: request.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Login attempt for user: {}", request.username);

    let token = state
        .account_service
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(TokenResponse::bearer(token)))
}
