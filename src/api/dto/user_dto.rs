//! 用户 DTO
//!
//! 定义个人资料相关的请求和响应数据结构。响应从不携带密码哈希。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// 用户响应
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// 用户 ID
    pub id: String,
    /// 用户名
    pub username: String,
    /// 邮箱
    pub email: String,
    /// 显示名称
    pub full_name: String,
    /// 是否激活
    pub is_active: bool,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 更新个人资料请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UpdateProfileRequest {
    /// 用户名
    pub username: Option<String>,
    /// 邮箱
    pub email: Option<String>,
    /// 显示名称
    pub full_name: Option<String>,
    /// 新密码
    pub password: Option<String>,
}
