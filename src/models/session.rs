use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 会话实体
///
/// 用户拥有的命名对话线程，承载有序的聊天消息。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// 会话唯一标识
    pub id: String,

    /// 所属用户标识
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

impl Session {
    /// 创建新会话
    pub fn new(user_id: &str, name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
            last_message_at: None,
        }
    }

    /// 刷新更新时间
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// 收到消息时更新活跃时间戳
    pub fn touch_message(&mut self) {
        let now = Utc::now();
        self.last_message_at = Some(now);
        self.updated_at = now;
    }
}
