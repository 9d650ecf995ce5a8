use mnemos::api::{self, app_state::AppState};
use mnemos::config::loader::ConfigLoader;
use mnemos::llm::{LanguageModel, create_language_model};
use mnemos::observability::{
    AppMetrics, ObservabilityState, create_observability_router, init_tracing,
};
use mnemos::security::auth::JwtAuth;
use mnemos::services::account::AccountService;
use mnemos::services::chat::{ChatService, ModelSelection};
use mnemos::services::memory::MemoryService;
use mnemos::services::session::SessionService;
use mnemos::services::{
    create_account_service, create_chat_service, create_memory_service, create_session_service,
};
use mnemos::storage::repository::{
    ChatMessageRepositoryImpl, MemoryRepositoryImpl, SessionRepositoryImpl, UserRepositoryImpl,
};
use mnemos::storage::surrealdb::SurrealDb;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    ConfigLoader::validate(&config)?;
    init_tracing(&config.logging);

    info!("Starting Mnemos...");
    info!("Configuration loaded successfully");

    // 存储不可达是致命错误：健康检查失败时进程直接退出，绝不以
    // 半初始化状态对外服务
    let db = SurrealDb::connect(&config.database).await?;
    db.define_indexes().await?;
    info!("Database connection initialized and health-checked");

    let user_repository = Arc::new(UserRepositoryImpl::new(db.inner()));
    let session_repository = Arc::new(SessionRepositoryImpl::new(db.inner()));
    let memory_repository = Arc::new(MemoryRepositoryImpl::new(db.inner()));
    let message_repository = Arc::new(ChatMessageRepositoryImpl::new(db.inner()));
    info!("Repositories initialized");

    if config.auth.jwt_secret == "dev-secret-change-in-production-min-32-chars" {
        warn!("Using built-in JWT secret, set MNEMOS_AUTH__JWT_SECRET in production");
    }
    let jwt_auth = Arc::new(JwtAuth::from_config(&config.auth));

    let account_service: Arc<dyn AccountService> =
        Arc::from(create_account_service(user_repository.clone(), jwt_auth.clone()));
    info!("Account service initialized");

    let session_service: Arc<dyn SessionService> = Arc::from(create_session_service(
        session_repository.clone(),
        message_repository.clone(),
    ));
    info!("Session service initialized");

    let memory_service: Arc<dyn MemoryService> =
        Arc::from(create_memory_service(memory_repository.clone()));
    info!("Memory service initialized");

    // API Key 缺失时返回降级客户端，进程仍然启动
    let language_model: Arc<dyn LanguageModel> = Arc::from(create_language_model(&config.model)?);
    info!("Language model client initialized");

    let chat_service: Arc<dyn ChatService> = Arc::from(create_chat_service(
        session_service.clone(),
        memory_service.clone(),
        message_repository.clone(),
        language_model,
        ModelSelection {
            reasoning_model: config.model.reasoning_model.clone(),
            default_model: config.model.default_model.clone(),
        },
    ));
    info!("Chat service initialized");

    let metrics = AppMetrics::default();

    let app_state = AppState::new(
        db,
        account_service,
        session_service,
        memory_service,
        chat_service,
        jwt_auth,
        metrics.clone(),
    );
    info!("Application state created");

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        metrics,
    ));
    let api_router = api::create_router(app_state);
    let router = create_observability_router(observability_state).merge(api_router);
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
