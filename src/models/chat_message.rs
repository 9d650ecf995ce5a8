use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    /// 用户消息
    #[serde(rename = "user")]
    User,
    /// 机器人消息
    #[serde(rename = "bot")]
    Bot,
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageType::User => write!(f, "user"),
            MessageType::Bot => write!(f, "bot"),
        }
    }
}

/// 聊天消息实体
///
/// 每个对话轮次成对产生：一条用户消息、一条机器人消息。
/// 消息只在会话级联删除时删除，从不更新。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// 消息唯一标识
    pub id: String,

    /// 所属会话标识
    pub session_id: String,

    /// 所属用户标识
    pub user_id: String,

    /// 消息内容
    pub content: String,

    /// 消息类型
    pub message_type: MessageType,

    /// 消息时间戳
    pub timestamp: DateTime<Utc>,

    /// 生成回复使用的模型（机器人消息；降级回复为 "error"）
    pub model_used: Option<String>,

    /// 是否使用推理模型
    pub reasoning: Option<bool>,

    /// 附加元数据
    pub metadata: Option<serde_json::Value>,
}

impl ChatMessage {
    /// 创建用户消息
    pub fn user(session_id: &str, user_id: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            message_type: MessageType::User,
            timestamp: Utc::now(),
            model_used: None,
            reasoning: None,
            metadata: None,
        }
    }

    /// 创建机器人消息
    pub fn bot(
        session_id: &str,
        user_id: &str,
        content: &str,
        model_used: &str,
        reasoning: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            message_type: MessageType::Bot,
            timestamp: Utc::now(),
            model_used: Some(model_used.to_string()),
            reasoning: Some(reasoning),
            metadata: None,
        }
    }
}
