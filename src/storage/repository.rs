//! 仓储层
//!
//! 四个记录集合（用户、会话、记忆、聊天消息）的类型化访问。
//! 每个仓储以 trait 形式定义，SurrealDB 实现通过注入的存储句柄工作，
//! 测试可以用内存假实现替换。

use async_trait::async_trait;
use surrealdb::{Surreal, engine::any::Any};

use crate::error::{AppError, Result};
use crate::models::chat_message::ChatMessage;
use crate::models::memory::{MemoType, Memory};
use crate::models::session::Session;
use crate::models::user::User;

/// 用户仓储 trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户
    async fn create(&self, user: &User) -> Result<User>;

    /// 根据 ID 获取用户
    async fn get_by_id(&self, id: &str) -> Result<Option<User>>;

    /// 根据用户名查找
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// 根据邮箱查找
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// 更新用户
    async fn update(&self, id: &str, user: &User) -> Result<Option<User>>;
}

/// 会话仓储 trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// 创建会话
    async fn create(&self, session: &Session) -> Result<Session>;

    /// 根据 ID 获取会话
    async fn get_by_id(&self, id: &str) -> Result<Option<Session>>;

    /// 更新会话
    async fn update(&self, id: &str, session: &Session) -> Result<Option<Session>>;

    /// 删除会话
    async fn delete(&self, id: &str) -> Result<bool>;

    /// 列出用户的所有会话（按 updated_at 降序）
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Session>>;
}

/// 记忆仓储 trait
#[async_trait]
pub trait MemoryRepository: Send + Sync {
    /// 创建记忆
    async fn create(&self, memory: &Memory) -> Result<Memory>;

    /// 根据 ID 获取记忆
    async fn get_by_id(&self, id: &str) -> Result<Option<Memory>>;

    /// 更新记忆
    async fn update(&self, id: &str, memory: &Memory) -> Result<Option<Memory>>;

    /// 删除记忆
    async fn delete(&self, id: &str) -> Result<bool>;

    /// 列出用户的记忆，可按类型过滤（按 created_at 降序）
    async fn list_by_user(&self, user_id: &str, memo_type: Option<MemoType>)
    -> Result<Vec<Memory>>;
}

/// 聊天消息仓储 trait
#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    /// 创建消息
    async fn create(&self, message: &ChatMessage) -> Result<ChatMessage>;

    /// 列出会话的消息（按 timestamp 升序）
    async fn list_by_session(
        &self,
        session_id: &str,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<ChatMessage>>;

    /// 统计会话的消息数量
    async fn count_by_session(&self, session_id: &str) -> Result<u64>;

    /// 删除会话的所有消息（级联删除）
    async fn delete_by_session(&self, session_id: &str) -> Result<()>;
}

/// 用户仓储实现
#[derive(Clone)]
pub struct UserRepositoryImpl {
    db: Surreal<Any>,
}

impl UserRepositoryImpl {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, user: &User) -> Result<User> {
        let created: Option<User> = self
            .db
            .create(("user", user.id.as_str()))
            .content(user.clone())
            .await?;

        created.ok_or_else(|| AppError::Database(format!("Failed to create user: {}", user.id)))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let result: Option<User> = self.db.select(("user", id)).await?;
        Ok(result)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let result: Vec<User> = self
            .db
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?
            .take(0)?;
        Ok(result.into_iter().next())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let result: Vec<User> = self
            .db
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(result.into_iter().next())
    }

    async fn update(&self, id: &str, user: &User) -> Result<Option<User>> {
        let updated: Option<User> = self.db.update(("user", id)).content(user.clone()).await?;
        Ok(updated)
    }
}

/// 会话仓储实现
#[derive(Clone)]
pub struct SessionRepositoryImpl {
    db: Surreal<Any>,
}

impl SessionRepositoryImpl {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for SessionRepositoryImpl {
    async fn create(&self, session: &Session) -> Result<Session> {
        let created: Option<Session> = self
            .db
            .create(("session", session.id.as_str()))
            .content(session.clone())
            .await?;

        created
            .ok_or_else(|| AppError::Database(format!("Failed to create session: {}", session.id)))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Session>> {
        let result: Option<Session> = self.db.select(("session", id)).await?;
        Ok(result)
    }

    async fn update(&self, id: &str, session: &Session) -> Result<Option<Session>> {
        let updated: Option<Session> = self
            .db
            .update(("session", id))
            .content(session.clone())
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result: Option<Session> = self.db.delete(("session", id)).await?;
        Ok(result.is_some())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Session>> {
        let query = "
            SELECT * FROM session
            WHERE user_id = $user_id
            ORDER BY updated_at DESC
        ";
        let result: Vec<Session> = self
            .db
            .query(query)
            .bind(("user_id", user_id.to_string()))
            .await?
            .take(0)?;
        Ok(result)
    }
}

/// 记忆仓储实现
#[derive(Clone)]
pub struct MemoryRepositoryImpl {
    db: Surreal<Any>,
}

impl MemoryRepositoryImpl {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemoryRepository for MemoryRepositoryImpl {
    async fn create(&self, memory: &Memory) -> Result<Memory> {
        let created: Option<Memory> = self
            .db
            .create(("memory", memory.id.as_str()))
            .content(memory.clone())
            .await?;

        created
            .ok_or_else(|| AppError::Database(format!("Failed to create memory: {}", memory.id)))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Memory>> {
        let result: Option<Memory> = self.db.select(("memory", id)).await?;
        Ok(result)
    }

    async fn update(&self, id: &str, memory: &Memory) -> Result<Option<Memory>> {
        let updated: Option<Memory> = self
            .db
            .update(("memory", id))
            .content(memory.clone())
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result: Option<Memory> = self.db.delete(("memory", id)).await?;
        Ok(result.is_some())
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        memo_type: Option<MemoType>,
    ) -> Result<Vec<Memory>> {
        let result: Vec<Memory> = match memo_type {
            Some(mt) => {
                let query = "
                    SELECT * FROM memory
                    WHERE user_id = $user_id AND memo_type = $memo_type
                    ORDER BY created_at DESC
                ";
                self.db
                    .query(query)
                    .bind(("user_id", user_id.to_string()))
                    .bind(("memo_type", mt.to_string()))
                    .await?
                    .take(0)?
            }
            None => {
                let query = "
                    SELECT * FROM memory
                    WHERE user_id = $user_id
                    ORDER BY created_at DESC
                ";
                self.db
                    .query(query)
                    .bind(("user_id", user_id.to_string()))
                    .await?
                    .take(0)?
            }
        };
        Ok(result)
    }
}

/// 聊天消息仓储实现
#[derive(Clone)]
pub struct ChatMessageRepositoryImpl {
    db: Surreal<Any>,
}

impl ChatMessageRepositoryImpl {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChatMessageRepository for ChatMessageRepositoryImpl {
    async fn create(&self, message: &ChatMessage) -> Result<ChatMessage> {
        let created: Option<ChatMessage> = self
            .db
            .create(("chat_message", message.id.as_str()))
            .content(message.clone())
            .await?;

        created
            .ok_or_else(|| AppError::Database(format!("Failed to create message: {}", message.id)))
    }

    async fn list_by_session(
        &self,
        session_id: &str,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<ChatMessage>> {
        let query = "
            SELECT * FROM chat_message
            WHERE session_id = $session_id
            ORDER BY timestamp ASC
            LIMIT $limit START $start
        ";
        let result: Vec<ChatMessage> = self
            .db
            .query(query)
            .bind(("session_id", session_id.to_string()))
            .bind(("limit", limit))
            .bind(("start", skip))
            .await?
            .take(0)?;
        Ok(result)
    }

    async fn count_by_session(&self, session_id: &str) -> Result<u64> {
        let query = "
            SELECT count() FROM chat_message
            WHERE session_id = $session_id
            GROUP ALL
        ";
        let result: Vec<serde_json::Value> = self
            .db
            .query(query)
            .bind(("session_id", session_id.to_string()))
            .await?
            .take(0)?;
        Ok(result
            .first()
            .and_then(|v| v.get("count"))
            .and_then(|c| c.as_u64())
            .unwrap_or(0))
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<()> {
        self.db
            .query("DELETE chat_message WHERE session_id = $session_id")
            .bind(("session_id", session_id.to_string()))
            .await?;
        Ok(())
    }
}
