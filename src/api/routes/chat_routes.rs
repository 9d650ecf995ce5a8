//! Chat Routes
//!
//! 定义对话轮次和历史查询的 API 路由。

use crate::api::handlers::chat_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// 创建聊天路由器
pub fn create_chat_router() -> Router<AppState> {
    Router::new()
        .route("/chat/:session_id/messages", get(get_chat_history))
        .route("/chat/:session_id/messages", post(send_message))
}
