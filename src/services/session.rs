//! 会话服务
//!
//! 提供会话的 CRUD 操作和生命周期管理。所有操作按调用者身份做
//! 显式归属检查：记录不存在与归属他人返回完全相同的 NotFound。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::session::Session;
use crate::security::validation::RequestValidator;
use crate::storage::repository::{ChatMessageRepository, SessionRepository};

/// 会话更新字段
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionPatch {
    /// 新会话名称
    pub name: Option<String>,
}

/// 会话服务 trait
#[async_trait]
pub trait SessionService: Send + Sync {
    /// 列出用户的会话（按 updated_at 降序）
    async fn list(&self, user_id: &str) -> Result<Vec<Session>>;

    /// 创建会话
    async fn create(&self, user_id: &str, name: &str) -> Result<Session>;

    /// 获取会话（含归属检查）
    async fn get(&self, user_id: &str, session_id: &str) -> Result<Session>;

    /// 更新会话，仅应用提供的字段，总是刷新 updated_at
    async fn update(&self, user_id: &str, session_id: &str, patch: SessionPatch)
    -> Result<Session>;

    /// 删除会话，级联删除其全部聊天消息
    async fn delete(&self, user_id: &str, session_id: &str) -> Result<()>;

    /// 收到消息时刷新 last_message_at / updated_at
    async fn touch_message(&self, session: &Session) -> Result<Session>;
}

/// 会话服务实现
pub struct SessionServiceImpl {
    repository: Arc<dyn SessionRepository>,
    message_repository: Arc<dyn ChatMessageRepository>,
    validator: RequestValidator,
}

impl SessionServiceImpl {
    /// 创建新的服务实例
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_repository: Arc<dyn ChatMessageRepository>,
    ) -> Self {
        Self {
            repository,
            message_repository,
            validator: RequestValidator::new(),
        }
    }

    /// 加载会话并做显式归属检查
    ///
    /// 不存在与归属他人返回同一个错误，避免暴露记录是否存在。
    async fn get_owned(&self, user_id: &str, session_id: &str) -> Result<Session> {
        let session = self
            .repository
            .get_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", session_id)))?;

        if session.user_id != user_id {
            return Err(AppError::NotFound(format!(
                "Session not found: {}",
                session_id
            )));
        }

        Ok(session)
    }
}

#[async_trait]
impl SessionService for SessionServiceImpl {
    async fn list(&self, user_id: &str) -> Result<Vec<Session>> {
        self.repository.list_by_user(user_id).await
    }

    async fn create(&self, user_id: &str, name: &str) -> Result<Session> {
        self.validator.validate_session_name(name)?;

        let session = Session::new(user_id, name);
        self.repository.create(&session).await
    }

    async fn get(&self, user_id: &str, session_id: &str) -> Result<Session> {
        self.get_owned(user_id, session_id).await
    }

    async fn update(
        &self,
        user_id: &str,
        session_id: &str,
        patch: SessionPatch,
    ) -> Result<Session> {
        let mut session = self.get_owned(user_id, session_id).await?;

        if let Some(name) = patch.name {
            self.validator.validate_session_name(&name)?;
            session.name = name;
        }

        session.touch();

        self.repository
            .update(&session.id, &session)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", session_id)))
    }

    async fn delete(&self, user_id: &str, session_id: &str) -> Result<()> {
        let session = self.get_owned(user_id, session_id).await?;

        // 级联删除与会话删除是一个逻辑单元：级联失败必须向上抛出，
        // 留下不一致状态是操作性错误而非可忽略事件。
        self.message_repository
            .delete_by_session(&session.id)
            .await
            .map_err(|e| {
                AppError::Database(format!(
                    "Cascade delete of messages for session {} failed: {}",
                    session.id, e
                ))
            })?;

        self.repository.delete(&session.id).await?;
        Ok(())
    }

    async fn touch_message(&self, session: &Session) -> Result<Session> {
        let mut session = session.clone();
        session.touch_message();

        self.repository
            .update(&session.id, &session)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", session.id)))
    }
}

/// 创建会话服务
pub fn create_session_service(
    repository: Arc<dyn SessionRepository>,
    message_repository: Arc<dyn ChatMessageRepository>,
) -> Box<dyn SessionService> {
    Box::new(SessionServiceImpl::new(repository, message_repository))
}
