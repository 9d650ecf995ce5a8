//! Memory Routes
//!
//! 定义记忆相关的 API 路由。

use crate::api::handlers::memory_handler::*;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::api::app_state::AppState;

/// 创建记忆路由器
pub fn create_memory_router() -> Router<AppState> {
    Router::new()
        .route("/memory", get(list_memories))
        .route("/memory", post(create_memory))
        .route("/memory/:id", get(get_memory))
        .route("/memory/:id", put(update_memory))
        .route("/memory/:id", delete(delete_memory))
}
