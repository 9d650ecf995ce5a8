//! 认证 DTO
//!
//! 定义注册和登录的请求与响应数据结构。

use serde::{Deserialize, Serialize};

/// 注册请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RegisterRequest {
    /// 用户名
    pub username: String,
    /// 邮箱
    pub email: String,
    /// 显示名称
    pub full_name: String,
    /// 明文密码（仅在请求中出现，存储前哈希）
    pub password: String,
}

/// 登录请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    /// 用户名
    pub username: String,
    /// 明文密码
    pub password: String,
}

/// 令牌响应
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// 访问令牌
    pub access_token: String,
    /// 令牌类型
    pub token_type: String,
}

impl TokenResponse {
    /// 创建 bearer 令牌响应
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
