//! 会话 DTO
//!
//! 定义会话相关的请求和响应数据结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::session::Session;

/// 创建会话请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CreateSessionRequest {
    /// 会话名称
    pub name: String,
}

/// 更新会话请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UpdateSessionRequest {
    /// 会话名称
    pub name: Option<String>,
}

/// 会话响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// 会话 ID
    pub id: String,
    /// 所属用户 ID
    pub user_id: String,
    /// 会话名称
    pub name: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
    /// 最后一条消息时间
    pub last_message_at: Option<DateTime<Utc>>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            name: session.name,
            created_at: session.created_at,
            updated_at: session.updated_at,
            last_message_at: session.last_message_at,
        }
    }
}

/// 会话列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionListResponse {
    /// 会话列表
    pub sessions: Vec<SessionResponse>,
    /// 总数
    pub total: usize,
}
