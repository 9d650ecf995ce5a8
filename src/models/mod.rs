//! 核心数据模型模块
//!
//! 定义 Mnemos 的核心数据实体：User, Session, Memory, ChatMessage。

pub mod chat_message;
pub mod memory;
pub mod session;
pub mod user;

pub use chat_message::*;
pub use memory::*;
pub use session::*;
pub use user::*;
