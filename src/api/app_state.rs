use crate::observability::AppMetrics;
use crate::security::auth::JwtAuth;
use crate::services::account::AccountService;
use crate::services::chat::ChatService;
use crate::services::memory::MemoryService;
use crate::services::session::SessionService;
use crate::storage::surrealdb::SurrealDb;
use std::sync::Arc;

/// Application state containing all shared services
#[derive(Clone)]
pub struct AppState {
    /// Database handle constructed once at startup
    pub db: SurrealDb,
    /// Account service for registration, login and profiles
    pub account_service: Arc<dyn AccountService>,
    /// Session service for session business logic
    pub session_service: Arc<dyn SessionService>,
    /// Memory service for memory business logic
    pub memory_service: Arc<dyn MemoryService>,
    /// Chat service orchestrating conversation turns
    pub chat_service: Arc<dyn ChatService>,
    /// JWT issuer/validator
    pub jwt_auth: Arc<JwtAuth>,
    /// Application metrics counters
    pub metrics: AppMetrics,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &"SurrealDb")
            .field("account_service", &"Arc<dyn AccountService>")
            .field("session_service", &"Arc<dyn SessionService>")
            .field("memory_service", &"Arc<dyn MemoryService>")
            .field("chat_service", &"Arc<dyn ChatService>")
            .field("jwt_auth", &"Arc<JwtAuth>")
            .finish()
    }
}

impl AppState {
    /// Create new application state
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db: SurrealDb,
        account_service: Arc<dyn AccountService>,
        session_service: Arc<dyn SessionService>,
        memory_service: Arc<dyn MemoryService>,
        chat_service: Arc<dyn ChatService>,
        jwt_auth: Arc<JwtAuth>,
        metrics: AppMetrics,
    ) -> Self {
        Self {
            db,
            account_service,
            session_service,
            memory_service,
            chat_service,
            jwt_auth,
            metrics,
        }
    }
}
