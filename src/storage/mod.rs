//! 存储层模块
//!
//! 提供数据持久化服务，基于 SurrealDB 文档存储。

pub mod repository;
pub mod surrealdb;

pub use repository::{
    ChatMessageRepository, ChatMessageRepositoryImpl, MemoryRepository, MemoryRepositoryImpl,
    SessionRepository, SessionRepositoryImpl, UserRepository, UserRepositoryImpl,
};
pub use surrealdb::SurrealDb;
