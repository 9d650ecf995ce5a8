//! Profile Routes
//!
//! 定义个人资料相关的 API 路由。

use crate::api::handlers::profile_handler::*;
use axum::{
    Router,
    routing::{get, put},
};

use crate::api::app_state::AppState;

/// 创建个人资料路由器
pub fn create_profile_router() -> Router<AppState> {
    Router::new()
        .route("/profile/me", get(get_my_profile))
        .route("/profile/me", put(update_my_profile))
}
