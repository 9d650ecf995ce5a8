//! 记忆数据模型
//!
//! 支持两类记忆：core（用户长期事实，影响助手的语气与行为）、
//! environment（情境/事件事实，只与当前对话相关）。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 记忆类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoType {
    /// 核心记忆 - 用户的长期身份事实、偏好、习惯
    #[serde(rename = "core")]
    Core,

    /// 环境记忆 - 情境/事件事实，服务于具体轮次
    #[serde(rename = "environment")]
    Environment,
}

impl MemoType {
    /// 从查询参数解析记忆类型，未知取值返回 None
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "core" => Some(MemoType::Core),
            "environment" => Some(MemoType::Environment),
            _ => None,
        }
    }
}

impl std::fmt::Display for MemoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoType::Core => write!(f, "core"),
            MemoType::Environment => write!(f, "environment"),
        }
    }
}

/// 记忆实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// 记忆唯一标识
    pub id: String,

    /// 所属用户标识
    pub user_id: String,

    /// 记忆内容
    pub content: String,

    /// 记忆类型
    pub memo_type: MemoType,

    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl Memory {
    /// 创建新记忆
    pub fn new(user_id: &str, content: &str, memo_type: MemoType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            memo_type,
            created_at: Utc::now(),
        }
    }
}
