//! 可观测性模块
//!
//! 提供健康检查、版本信息、简单指标和结构化日志初始化。

use axum::{Json, Router, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

// ===== Simple Metrics (using atomics for zero-dep implementation) =====

/// 简单应用指标
#[derive(Clone, Default)]
pub struct AppMetrics {
    pub http_requests_total: Arc<AtomicU64>,
    pub turns_total: Arc<AtomicU64>,
    pub model_degraded_total: Arc<AtomicU64>,
    pub errors_total: Arc<AtomicU64>,
}

impl AppMetrics {
    /// 记录 HTTP 请求
    pub fn record_http_request(&self) {
        self.http_requests_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录完成的对话轮次
    pub fn record_turn(&self) {
        self.turns_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录降级的模型调用
    pub fn record_model_degraded(&self) {
        self.model_degraded_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录错误
    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 导出文本格式指标
    pub fn gather(&self) -> String {
        format!(
            "http_requests_total {}\nturns_total {}\nmodel_degraded_total {}\nerrors_total {}\n",
            self.http_requests_total.load(Ordering::SeqCst),
            self.turns_total.load(Ordering::SeqCst),
            self.model_degraded_total.load(Ordering::SeqCst),
            self.errors_total.load(Ordering::SeqCst),
        )
    }
}

/// 可观测性状态
#[derive(Clone)]
pub struct ObservabilityState {
    /// 应用版本
    pub version: String,
    /// 启动时间
    pub started_at: DateTime<Utc>,
    /// 指标
    pub metrics: AppMetrics,
}

impl ObservabilityState {
    /// 创建新状态
    pub fn new(version: String, metrics: AppMetrics) -> Self {
        Self {
            version,
            started_at: Utc::now(),
            metrics,
        }
    }

    /// 运行时长（秒）
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// 健康状态响应
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
}

/// 健康检查端点
pub async fn health_check(
    state: axum::extract::State<Arc<ObservabilityState>>,
) -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// 存活探针端点
pub async fn liveness() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "alive" }))
}

/// 就绪探针端点
pub async fn readiness() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ready" }))
}

/// 指标端点
pub async fn metrics(state: axum::extract::State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let output = state.metrics.gather();
    (axum::http::StatusCode::OK, output)
}

/// 版本信息端点
pub async fn version(state: axum::extract::State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Structured Logging =====

/// 初始化结构化日志
///
/// RUST_LOG 优先于配置文件中的日志级别。
pub fn init_tracing(config: &crate::config::config::LoggingConfig) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());

    if config.structured {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
