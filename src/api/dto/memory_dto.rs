//! 记忆 DTO
//!
//! 定义记忆相关的请求和响应数据结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::memory::{MemoType, Memory};

/// 创建记忆请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CreateMemoryRequest {
    /// 记忆内容
    pub content: String,
    /// 记忆类型（core 或 environment）
    pub memo_type: String,
}

/// 更新记忆请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UpdateMemoryRequest {
    /// 记忆内容
    pub content: Option<String>,
    /// 记忆类型
    pub memo_type: Option<String>,
}

/// 记忆列表查询参数
#[derive(Debug, Deserialize, Default)]
pub struct ListMemoriesParams {
    /// 类型过滤（core 或 environment）
    pub memo_type: Option<String>,
}

/// 记忆响应
#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryResponse {
    /// 记忆 ID
    pub id: String,
    /// 所属用户 ID
    pub user_id: String,
    /// 记忆内容
    pub content: String,
    /// 记忆类型
    pub memo_type: MemoType,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl From<Memory> for MemoryResponse {
    fn from(memory: Memory) -> Self {
        Self {
            id: memory.id,
            user_id: memory.user_id,
            content: memory.content,
            memo_type: memory.memo_type,
            created_at: memory.created_at,
        }
    }
}

/// 记忆列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryListResponse {
    /// 记忆列表
    pub memories: Vec<MemoryResponse>,
    /// 总数
    pub total: usize,
}
