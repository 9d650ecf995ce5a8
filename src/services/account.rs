//! 账号服务
//!
//! 提供注册、登录与个人资料管理。用户名/邮箱的唯一性在插入前检查，
//! 冲突以 Conflict 返回并指明字段；登录失败（用户不存在或密码错误）
//! 返回完全一致的 Unauthorized。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::security::auth::JwtAuth;
use crate::security::password::{hash_password, verify_password};
use crate::security::validation::RequestValidator;
use crate::storage::repository::UserRepository;

/// 注册信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// 个人资料更新字段
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
}

/// 账号服务 trait
#[async_trait]
pub trait AccountService: Send + Sync {
    /// 注册新用户
    async fn register(&self, registration: Registration) -> Result<User>;

    /// 用户名 + 密码登录，返回访问令牌
    async fn login(&self, username: &str, password: &str) -> Result<String>;

    /// 根据令牌主体解析当前用户（缺失或未激活一律 Unauthorized）
    async fn current_user(&self, subject: &str) -> Result<User>;

    /// 更新当前用户资料
    async fn update_profile(&self, user: &User, patch: ProfilePatch) -> Result<User>;
}

/// 账号服务实现
pub struct AccountServiceImpl {
    repository: Arc<dyn UserRepository>,
    jwt_auth: Arc<JwtAuth>,
    validator: RequestValidator,
}

impl AccountServiceImpl {
    /// 创建新的服务实例
    pub fn new(repository: Arc<dyn UserRepository>, jwt_auth: Arc<JwtAuth>) -> Self {
        Self {
            repository,
            jwt_auth,
            validator: RequestValidator::new(),
        }
    }

    async fn ensure_email_free(&self, email: &str) -> Result<()> {
        if self.repository.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        Ok(())
    }

    async fn ensure_username_free(&self, username: &str) -> Result<()> {
        if self.repository.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this username already exists".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn register(&self, registration: Registration) -> Result<User> {
        self.validator.validate_username(&registration.username)?;
        self.validator.validate_email(&registration.email)?;
        self.validator.validate_password(&registration.password)?;
        self.validator.validate_full_name(&registration.full_name)?;

        self.ensure_email_free(&registration.email).await?;
        self.ensure_username_free(&registration.username).await?;

        let hashed = hash_password(&registration.password)?;
        let user = User::new(
            &registration.username,
            &registration.email,
            &registration.full_name,
            &hashed,
        );

        self.repository.create(&user).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<String> {
        // 用户不存在与密码错误必须不可区分
        let user = match self.repository.find_by_username(username).await? {
            Some(user) if verify_password(password, &user.hashed_password) => user,
            _ => {
                return Err(AppError::Unauthorized(
                    "Incorrect username or password".to_string(),
                ));
            }
        };

        self.jwt_auth.issue_token(&user.id)
    }

    async fn current_user(&self, subject: &str) -> Result<User> {
        let user = self
            .repository
            .get_by_id(subject)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Could not validate credentials".to_string()))?;

        if !user.is_active {
            return Err(AppError::Unauthorized("Inactive user".to_string()));
        }

        Ok(user)
    }

    async fn update_profile(&self, user: &User, patch: ProfilePatch) -> Result<User> {
        let mut updated = user.clone();

        if let Some(username) = patch.username {
            self.validator.validate_username(&username)?;
            if username != user.username {
                self.ensure_username_free(&username).await?;
            }
            updated.username = username;
        }

        if let Some(email) = patch.email {
            self.validator.validate_email(&email)?;
            if email != user.email {
                self.ensure_email_free(&email).await?;
            }
            updated.email = email;
        }

        if let Some(full_name) = patch.full_name {
            self.validator.validate_full_name(&full_name)?;
            updated.full_name = full_name;
        }

        if let Some(password) = patch.password {
            self.validator.validate_password(&password)?;
            updated.hashed_password = hash_password(&password)?;
        }

        updated.touch();

        self.repository
            .update(&updated.id, &updated)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found: {}", user.id)))
    }
}

/// 创建账号服务
pub fn create_account_service(
    repository: Arc<dyn UserRepository>,
    jwt_auth: Arc<JwtAuth>,
) -> Box<dyn AccountService> {
    Box::new(AccountServiceImpl::new(repository, jwt_auth))
}
