//! API 模块
//!
//! 提供 REST API 支持。

#[cfg(test)]
mod api_tests;
pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use crate::security::middleware::{auth_middleware, security_headers_middleware};
use axum::{
    Router,
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// 请求指标中间件
async fn metrics_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    state.metrics.record_http_request();

    let response = next.run(req).await;
    if response.status().is_server_error() {
        state.metrics.record_error();
    }
    response
}

/// 创建应用路由器
///
/// 注册/登录之外的所有端点都要求 Bearer 认证。
pub fn create_router(app_state: AppState) -> Router {
    let public = Router::new().merge(routes::auth_routes::create_auth_router());

    let protected = Router::new()
        .merge(routes::profile_routes::create_profile_router())
        .merge(routes::session_routes::create_session_router())
        .merge(routes::memory_routes::create_memory_router())
        .merge(routes::chat_routes::create_chat_router())
        .route_layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api", public.merge(protected))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
