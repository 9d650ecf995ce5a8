//! 记忆服务
//!
//! 提供用户记忆的 CRUD 操作，类别限定在封闭集合（core / environment），
//! 归属检查与会话服务相同：不存在与归属他人不可区分。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::memory::{MemoType, Memory};
use crate::security::validation::RequestValidator;
use crate::storage::repository::MemoryRepository;

/// 记忆更新字段
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MemoryPatch {
    /// 新记忆内容
    pub content: Option<String>,
    /// 新记忆类型
    pub memo_type: Option<MemoType>,
}

/// 记忆服务 trait
#[async_trait]
pub trait MemoryService: Send + Sync {
    /// 列出用户的记忆，可按类型过滤（按 created_at 降序）
    async fn list(&self, user_id: &str, memo_type: Option<MemoType>) -> Result<Vec<Memory>>;

    /// 创建记忆
    async fn create(&self, user_id: &str, content: &str, memo_type: MemoType) -> Result<Memory>;

    /// 获取记忆（含归属检查）
    async fn get(&self, user_id: &str, memory_id: &str) -> Result<Memory>;

    /// 更新记忆，仅应用提供的字段
    async fn update(&self, user_id: &str, memory_id: &str, patch: MemoryPatch) -> Result<Memory>;

    /// 删除记忆（无级联）
    async fn delete(&self, user_id: &str, memory_id: &str) -> Result<()>;
}

/// 记忆服务实现
pub struct MemoryServiceImpl {
    repository: Arc<dyn MemoryRepository>,
    validator: RequestValidator,
}

impl MemoryServiceImpl {
    /// 创建新的服务实例
    pub fn new(repository: Arc<dyn MemoryRepository>) -> Self {
        Self {
            repository,
            validator: RequestValidator::new(),
        }
    }

    /// 加载记忆并做显式归属检查
    async fn get_owned(&self, user_id: &str, memory_id: &str) -> Result<Memory> {
        let memory = self
            .repository
            .get_by_id(memory_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Memory not found: {}", memory_id)))?;

        if memory.user_id != user_id {
            return Err(AppError::NotFound(format!(
                "Memory not found: {}",
                memory_id
            )));
        }

        Ok(memory)
    }
}

#[async_trait]
impl MemoryService for MemoryServiceImpl {
    async fn list(&self, user_id: &str, memo_type: Option<MemoType>) -> Result<Vec<Memory>> {
        self.repository.list_by_user(user_id, memo_type).await
    }

    async fn create(&self, user_id: &str, content: &str, memo_type: MemoType) -> Result<Memory> {
        self.validator.validate_content(content)?;

        let memory = Memory::new(user_id, content, memo_type);
        self.repository.create(&memory).await
    }

    async fn get(&self, user_id: &str, memory_id: &str) -> Result<Memory> {
        self.get_owned(user_id, memory_id).await
    }

    async fn update(&self, user_id: &str, memory_id: &str, patch: MemoryPatch) -> Result<Memory> {
        let mut memory = self.get_owned(user_id, memory_id).await?;

        if let Some(content) = patch.content {
            self.validator.validate_content(&content)?;
            memory.content = content;
        }
        if let Some(memo_type) = patch.memo_type {
            memory.memo_type = memo_type;
        }

        self.repository
            .update(&memory.id, &memory)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Memory not found: {}", memory_id)))
    }

    async fn delete(&self, user_id: &str, memory_id: &str) -> Result<()> {
        let memory = self.get_owned(user_id, memory_id).await?;
        self.repository.delete(&memory.id).await?;
        Ok(())
    }
}

/// 创建记忆服务
pub fn create_memory_service(repository: Arc<dyn MemoryRepository>) -> Box<dyn MemoryService> {
    Box::new(MemoryServiceImpl::new(repository))
}
