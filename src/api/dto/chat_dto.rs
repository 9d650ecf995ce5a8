//! 聊天 DTO
//!
//! 定义消息发送和历史查询的请求与响应数据结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::chat_message::{ChatMessage, MessageType};

/// 发送消息请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SendMessageRequest {
    /// 消息内容
    pub content: String,
    /// 是否使用推理模型
    pub reasoning: bool,
}

/// 历史查询参数
#[derive(Debug, Deserialize, Default)]
pub struct ChatHistoryParams {
    /// 返回条数（1..=100，默认 50）
    pub limit: Option<usize>,
    /// 跳过条数
    pub skip: Option<usize>,
}

/// 聊天消息响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    /// 消息 ID
    pub id: String,
    /// 所属会话 ID
    pub session_id: String,
    /// 所属用户 ID
    pub user_id: String,
    /// 消息内容
    pub content: String,
    /// 消息类型
    pub message_type: MessageType,
    /// 消息时间戳
    pub timestamp: DateTime<Utc>,
    /// 使用的模型
    pub model_used: Option<String>,
    /// 是否使用推理模型
    pub reasoning: Option<bool>,
    /// 附加元数据
    pub metadata: Option<serde_json::Value>,
}

impl From<ChatMessage> for ChatMessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            session_id: message.session_id,
            user_id: message.user_id,
            content: message.content,
            message_type: message.message_type,
            timestamp: message.timestamp,
            model_used: message.model_used,
            reasoning: message.reasoning,
            metadata: message.metadata,
        }
    }
}

/// 聊天历史响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
    /// 消息列表（按 timestamp 升序）
    pub messages: Vec<ChatMessageResponse>,
    /// 会话 ID
    pub session_id: String,
}
