//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod auth_handler;
pub mod chat_handler;
pub mod memory_handler;
pub mod profile_handler;
pub mod session_handler;

pub use auth_handler::*;
pub use chat_handler::*;
pub use memory_handler::*;
pub use profile_handler::*;
pub use session_handler::*;

use crate::api::app_state::AppState;
use crate::error::Result;
use crate::models::user::User;
use crate::security::auth::Claims;

/// 根据中间件注入的 Claims 解析当前用户
///
/// 用户缺失或未激活与无效令牌一样返回 Unauthorized。
pub(crate) async fn resolve_current_user(state: &AppState, claims: &Claims) -> Result<User> {
    state.account_service.current_user(&claims.sub).await
}
