use axum::{
    Json,
    extract::{Extension, State},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::user_dto::*, handlers::resolve_current_user},
    error::AppError,
    security::auth::Claims,
    services::account::ProfilePatch,
};

pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting profile for subject: {}", claims.sub);

    let user = resolve_current_user(&state, &claims).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn update_my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Updating profile for subject: {}", claims.sub);

    let user = resolve_current_user(&state, &claims).await?;
    let updated = state
        .account_service
        .update_profile(
            &user,
            ProfilePatch {
                username: request.username,
                email: request.email,
                full_name: request.full_name,
                password: request.password,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(updated)))
}
