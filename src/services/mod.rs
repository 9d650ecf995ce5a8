//! 服务模块

pub mod account;
pub mod chat;
pub mod memory;
pub mod session;

pub use account::{AccountService, ProfilePatch, Registration, create_account_service};
pub use chat::{ChatService, ModelOutcome, ModelSelection, create_chat_service};
pub use memory::{MemoryPatch, MemoryService, create_memory_service};
pub use session::{SessionPatch, SessionService, create_session_service};
