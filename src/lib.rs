//! Mnemos - 记忆增强的个性化对话助手后端
//!
//! 为每个用户维护会话、长期记忆与对话历史，将用户消息连同记忆上下文
//! 转发给托管的大语言模型，并持久化完整的对话轮次。

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod observability;
pub mod security;
pub mod services;
pub mod storage;
