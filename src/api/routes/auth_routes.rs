//! Auth Routes
//!
//! 定义注册和登录的 API 路由（无需认证）。

use crate::api::handlers::auth_handler::*;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建认证路由器
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}
