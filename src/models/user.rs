use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户实体
///
/// 账号信息的根节点，所有会话、记忆和消息都通过 user_id 归属到用户。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// 用户唯一标识
    pub id: String,

    /// 用户名（全局唯一）
    pub username: String,

    /// 邮箱（全局唯一）
    pub email: String,

    /// 显示名称
    pub full_name: String,

    /// 密码哈希（argon2 PHC 字符串）
    pub hashed_password: String,

    /// 是否激活
    pub is_active: bool,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 创建新用户
    pub fn new(username: &str, email: &str, full_name: &str, hashed_password: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            hashed_password: hashed_password.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// 刷新更新时间
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
