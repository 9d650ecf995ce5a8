//! 对话轮次编排器
//!
//! 系统的核心服务：给定认证用户、会话与一条消息，先持久化用户消息，
//! 再从记忆组装上下文、调用外部模型并持久化机器人回复。
//!
//! 轮次是严格线性的：
//! `received → user_message_persisted → session_touched → context_assembled
//! → model_invoked (ok|failed) → bot_message_persisted → returned`。
//! 用户消息一旦写入绝不回滚；模型失败不会让轮次失败，而是落库一条
//! 标记为 `model_used = "error"` 的降级回复。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::error::Result;
use crate::llm::LanguageModel;
use crate::models::chat_message::ChatMessage;
use crate::models::memory::{MemoType, Memory};
use crate::models::user::User;
use crate::security::validation::RequestValidator;
use crate::services::memory::MemoryService;
use crate::services::session::SessionService;
use crate::storage::repository::ChatMessageRepository;

/// 固定的助手人设
const SYSTEM_PERSONA: &str = "You are a personalized AI assistant that remembers details about \
                              the user and provides helpful, accurate responses.";

/// 核心记忆块标题
const CORE_MEMORIES_HEADING: &str = "Core Memories:";

/// 环境记忆块标题
const ENVIRONMENT_MEMORIES_HEADING: &str = "Environment/Event Memories:";

/// 降级回复文案
const DEGRADED_REPLY: &str = "I'm sorry, I encountered an error while processing your request. \
                              Please try again later.";

/// 降级回复的模型标记
const ERROR_MODEL_TAG: &str = "error";

/// 模型标识选择（双路开关，而非通用路由表）
#[derive(Debug, Clone)]
pub struct ModelSelection {
    /// reasoning=true 时使用的模型
    pub reasoning_model: String,
    /// 默认模型
    pub default_model: String,
}

impl ModelSelection {
    /// 按推理开关选择模型标识
    pub fn select(&self, use_reasoning: bool) -> &str {
        if use_reasoning {
            &self.reasoning_model
        } else {
            &self.default_model
        }
    }
}

/// 模型调用结果
///
/// 降级不是异常拦截，而是显式的第二种合法产出：持久化步骤统一消费
/// 两个变体，调用方永远得到一条机器人消息。
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    /// 模型正常返回的文本
    Reply(String),
    /// 模型不可用或调用失败，携带失败原因
    Degraded(String),
}

/// 对话服务 trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// 提交一个对话轮次，返回机器人回复
    async fn submit_turn(
        &self,
        user: &User,
        session_id: &str,
        content: &str,
        use_reasoning: bool,
    ) -> Result<ChatMessage>;

    /// 获取会话历史（按 timestamp 升序）
    async fn history(
        &self,
        user: &User,
        session_id: &str,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<ChatMessage>>;
}

/// 对话服务实现
pub struct ChatServiceImpl {
    session_service: Arc<dyn SessionService>,
    memory_service: Arc<dyn MemoryService>,
    message_repository: Arc<dyn ChatMessageRepository>,
    model: Arc<dyn LanguageModel>,
    models: ModelSelection,
    validator: RequestValidator,
}

impl ChatServiceImpl {
    /// 创建新的服务实例
    pub fn new(
        session_service: Arc<dyn SessionService>,
        memory_service: Arc<dyn MemoryService>,
        message_repository: Arc<dyn ChatMessageRepository>,
        model: Arc<dyn LanguageModel>,
        models: ModelSelection,
    ) -> Self {
        Self {
            session_service,
            memory_service,
            message_repository,
            model,
            models,
            validator: RequestValidator::new(),
        }
    }

    /// 调用模型并将任何失败折叠为降级结果
    async fn invoke_model(
        &self,
        model_name: &str,
        system_instruction: &str,
        user_turn: &str,
    ) -> ModelOutcome {
        match self
            .model
            .generate(model_name, system_instruction, user_turn)
            .await
        {
            Ok(text) => ModelOutcome::Reply(text),
            Err(e) => ModelOutcome::Degraded(e.to_string()),
        }
    }
}

/// 将记忆渲染为提示块
///
/// 每条记忆渲染为 `- {content} (Recorded: {ISO-8601})`；无记忆时返回空串。
pub fn format_memory_block(heading: &str, memories: &[Memory]) -> String {
    if memories.is_empty() {
        return String::new();
    }

    let entries: Vec<String> = memories
        .iter()
        .map(|m| format!("- {} (Recorded: {})", m.content, m.created_at.to_rfc3339()))
        .collect();

    format!("{}\n{}", heading, entries.join("\n"))
}

/// 组装系统指令：固定人设 + 核心记忆块
pub fn build_system_instruction(core_memories: &[Memory]) -> String {
    let block = format_memory_block(CORE_MEMORIES_HEADING, core_memories);
    if block.is_empty() {
        SYSTEM_PERSONA.to_string()
    } else {
        format!("{}\n\n{}", SYSTEM_PERSONA, block)
    }
}

/// 组装用户轮次：环境记忆块 + 原始消息
///
/// 环境记忆只进入用户轮次，不混入系统指令：核心记忆是长期身份事实，
/// 环境记忆是只服务于当前轮次的情境事实。
pub fn build_user_turn(environment_memories: &[Memory], content: &str) -> String {
    let block = format_memory_block(ENVIRONMENT_MEMORIES_HEADING, environment_memories);
    if block.is_empty() {
        content.to_string()
    } else {
        format!("{}\n\nUser Query: {}", block, content)
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn submit_turn(
        &self,
        user: &User,
        session_id: &str,
        content: &str,
        use_reasoning: bool,
    ) -> Result<ChatMessage> {
        self.validator.validate_content(content)?;

        // 1. 解析会话并检查归属
        let session = self.session_service.get(&user.id, session_id).await?;

        // 2. 模型调用前先落库用户消息：后续任何失败都不丢输入
        let user_message = ChatMessage::user(&session.id, &user.id, content);
        self.message_repository.create(&user_message).await?;

        // 3. 刷新会话活跃时间
        self.session_service.touch_message(&session).await?;

        // 4. 加载两类记忆，各自按 created_at 降序
        let core_memories = self
            .memory_service
            .list(&user.id, Some(MemoType::Core))
            .await?;
        let environment_memories = self
            .memory_service
            .list(&user.id, Some(MemoType::Environment))
            .await?;

        // 5-6. 渲染上下文
        let system_instruction = build_system_instruction(&core_memories);
        let user_turn = build_user_turn(&environment_memories, content);

        // 7. 双路模型选择
        let model_name = self.models.select(use_reasoning);

        // 8-9. 调用模型；任何失败都折叠为降级回复
        let outcome = self
            .invoke_model(model_name, &system_instruction, &user_turn)
            .await;

        let bot_message = match outcome {
            ModelOutcome::Reply(text) => {
                ChatMessage::bot(&session.id, &user.id, &text, model_name, use_reasoning)
            }
            ModelOutcome::Degraded(reason) => {
                warn!(session_id = %session.id, "Model call degraded: {}", reason);
                let mut message = ChatMessage::bot(
                    &session.id,
                    &user.id,
                    DEGRADED_REPLY,
                    ERROR_MODEL_TAG,
                    use_reasoning,
                );
                message.metadata = Some(serde_json::json!({ "error": reason }));
                message
            }
        };

        // 10. 持久化并返回机器人消息
        self.message_repository.create(&bot_message).await
    }

    async fn history(
        &self,
        user: &User,
        session_id: &str,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<ChatMessage>> {
        let session = self.session_service.get(&user.id, session_id).await?;
        self.message_repository
            .list_by_session(&session.id, limit, skip)
            .await
    }
}

/// 创建对话服务
pub fn create_chat_service(
    session_service: Arc<dyn SessionService>,
    memory_service: Arc<dyn MemoryService>,
    message_repository: Arc<dyn ChatMessageRepository>,
    model: Arc<dyn LanguageModel>,
    models: ModelSelection,
) -> Box<dyn ChatService> {
    Box::new(ChatServiceImpl::new(
        session_service,
        memory_service,
        message_repository,
        model,
        models,
    ))
}
