// Integration tests for the account/session/memory services and the
// conversation turn orchestrator, exercised over in-memory repository
// fakes and stub language models.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use mnemos::error::{AppError, Result};
use mnemos::llm::LanguageModel;
use mnemos::models::chat_message::{ChatMessage, MessageType};
use mnemos::models::memory::{MemoType, Memory};
use mnemos::models::session::Session;
use mnemos::models::user::User;
use mnemos::security::auth::JwtAuth;
use mnemos::services::account::{AccountService, AccountServiceImpl, Registration};
use mnemos::services::chat::{ChatService, ChatServiceImpl, ModelSelection};
use mnemos::services::memory::{MemoryService, MemoryServiceImpl};
use mnemos::services::session::{SessionPatch, SessionService, SessionServiceImpl};
use mnemos::storage::repository::{
    ChatMessageRepository, MemoryRepository, SessionRepository, UserRepository,
};

// ============ In-memory repository fakes ============

#[derive(Default)]
struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        self.users
            .lock()
            .unwrap()
            .insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, id: &str, user: &User) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(id) {
            users.insert(id.to_string(), user.clone());
            Ok(Some(user.clone()))
        } else {
            Ok(None)
        }
    }
}

#[derive(Default)]
struct InMemorySessionRepository {
    sessions: Mutex<HashMap<String, Session>>,
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &Session) -> Result<Session> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(session.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.lock().unwrap().get(id).cloned())
    }

    async fn update(&self, id: &str, session: &Session) -> Result<Option<Session>> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(id) {
            sessions.insert(id.to_string(), session.clone());
            Ok(Some(session.clone()))
        } else {
            Ok(None)
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.sessions.lock().unwrap().remove(id).is_some())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }
}

#[derive(Default)]
struct InMemoryMemoryRepository {
    memories: Mutex<HashMap<String, Memory>>,
}

#[async_trait]
impl MemoryRepository for InMemoryMemoryRepository {
    async fn create(&self, memory: &Memory) -> Result<Memory> {
        self.memories
            .lock()
            .unwrap()
            .insert(memory.id.clone(), memory.clone());
        Ok(memory.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Memory>> {
        Ok(self.memories.lock().unwrap().get(id).cloned())
    }

    async fn update(&self, id: &str, memory: &Memory) -> Result<Option<Memory>> {
        let mut memories = self.memories.lock().unwrap();
        if memories.contains_key(id) {
            memories.insert(id.to_string(), memory.clone());
            Ok(Some(memory.clone()))
        } else {
            Ok(None)
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.memories.lock().unwrap().remove(id).is_some())
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        memo_type: Option<MemoType>,
    ) -> Result<Vec<Memory>> {
        let mut memories: Vec<Memory> = self
            .memories
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.user_id == user_id)
            .filter(|m| memo_type.map(|mt| m.memo_type == mt).unwrap_or(true))
            .cloned()
            .collect();
        memories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(memories)
    }
}

#[derive(Default)]
struct InMemoryChatMessageRepository {
    messages: Mutex<Vec<ChatMessage>>,
}

#[async_trait]
impl ChatMessageRepository for InMemoryChatMessageRepository {
    async fn create(&self, message: &ChatMessage) -> Result<ChatMessage> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(message.clone())
    }

    async fn list_by_session(
        &self,
        session_id: &str,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<ChatMessage>> {
        let mut messages: Vec<ChatMessage> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.session_id == session_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(messages.into_iter().skip(skip).take(limit).collect())
    }

    async fn count_by_session(&self, session_id: &str) -> Result<u64> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.session_id == session_id)
            .count() as u64)
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<()> {
        self.messages
            .lock()
            .unwrap()
            .retain(|m| m.session_id != session_id);
        Ok(())
    }
}

// ============ Stub language models ============

/// Records every prompt it receives and replies with a fixed text.
#[derive(Default)]
struct RecordingModel {
    calls: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl LanguageModel for RecordingModel {
    async fn generate(
        &self,
        model: &str,
        system_instruction: &str,
        user_turn: &str,
    ) -> Result<String> {
        self.calls.lock().unwrap().push((
            model.to_string(),
            system_instruction.to_string(),
            user_turn.to_string(),
        ));
        Ok("It looks sunny today.".to_string())
    }
}

/// Always fails, simulating network/auth/quota failures.
struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    async fn generate(&self, _model: &str, _system: &str, _user: &str) -> Result<String> {
        Err(AppError::Model("simulated outage".to_string()))
    }
}

// ============ Test fixtures ============

struct Fixture {
    users: Arc<InMemoryUserRepository>,
    sessions: Arc<InMemorySessionRepository>,
    memories: Arc<InMemoryMemoryRepository>,
    messages: Arc<InMemoryChatMessageRepository>,
    jwt_auth: Arc<JwtAuth>,
    account_service: AccountServiceImpl,
    session_service: Arc<SessionServiceImpl>,
    memory_service: Arc<MemoryServiceImpl>,
}

fn models() -> ModelSelection {
    ModelSelection {
        reasoning_model: "gemini-2.0-flash".to_string(),
        default_model: "gemini-2.0-flash-lite".to_string(),
    }
}

impl Fixture {
    fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let sessions = Arc::new(InMemorySessionRepository::default());
        let memories = Arc::new(InMemoryMemoryRepository::default());
        let messages = Arc::new(InMemoryChatMessageRepository::default());
        let jwt_auth = Arc::new(JwtAuth::new(
            "test-secret-at-least-32-chars-long!!",
            "mnemos",
            3600,
        ));

        let account_service = AccountServiceImpl::new(users.clone(), jwt_auth.clone());
        let session_service = Arc::new(SessionServiceImpl::new(
            sessions.clone(),
            messages.clone(),
        ));
        let memory_service = Arc::new(MemoryServiceImpl::new(memories.clone()));

        Self {
            users,
            sessions,
            memories,
            messages,
            jwt_auth,
            account_service,
            session_service,
            memory_service,
        }
    }

    fn chat_service(&self, model: Arc<dyn LanguageModel>) -> ChatServiceImpl {
        ChatServiceImpl::new(
            self.session_service.clone(),
            self.memory_service.clone(),
            self.messages.clone(),
            model,
            models(),
        )
    }

    async fn seeded_user(&self) -> User {
        self.account_service
            .register(Registration {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                full_name: "Alice".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap()
    }
}

// ============ Registration and login ============

#[tokio::test]
async fn test_duplicate_email_registration_conflicts() {
    let fixture = Fixture::new();
    fixture.seeded_user().await;

    let err = fixture
        .account_service
        .register(Registration {
            username: "different".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Someone Else".to_string(),
            password: "password456".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("email")));
}

#[tokio::test]
async fn test_duplicate_username_registration_conflicts() {
    let fixture = Fixture::new();
    fixture.seeded_user().await;

    let err = fixture
        .account_service
        .register(Registration {
            username: "alice".to_string(),
            email: "other@example.com".to_string(),
            full_name: "Someone Else".to_string(),
            password: "password456".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("username")));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let fixture = Fixture::new();
    fixture.seeded_user().await;

    let wrong_password = fixture
        .account_service
        .login("alice", "not-the-password")
        .await
        .unwrap_err();
    let unknown_user = fixture
        .account_service
        .login("nobody", "password123")
        .await
        .unwrap_err();

    match (&wrong_password, &unknown_user) {
        (AppError::Unauthorized(a), AppError::Unauthorized(b)) => assert_eq!(a, b),
        other => panic!("expected uniform Unauthorized, got {:?}", other),
    }
}

#[tokio::test]
async fn test_short_password_is_rejected() {
    let fixture = Fixture::new();

    let err = fixture
        .account_service
        .register(Registration {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            full_name: "Bob".to_string(),
            password: "1234567".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

// ============ Session ownership and cascade ============

#[tokio::test]
async fn test_foreign_session_is_not_found() {
    let fixture = Fixture::new();
    let alice = fixture.seeded_user().await;

    let session = fixture
        .session_service
        .create(&alice.id, "Alice's chat")
        .await
        .unwrap();

    let missing = fixture
        .session_service
        .get("somebody-else", "does-not-exist")
        .await
        .unwrap_err();
    let foreign = fixture
        .session_service
        .get("somebody-else", &session.id)
        .await
        .unwrap_err();

    // 他人的会话与不存在的会话必须返回同类错误
    assert!(matches!(missing, AppError::NotFound(_)));
    assert!(matches!(foreign, AppError::NotFound(_)));

    let update = fixture
        .session_service
        .update(
            "somebody-else",
            &session.id,
            SessionPatch {
                name: Some("hijacked".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(update, AppError::NotFound(_)));

    let delete = fixture
        .session_service
        .delete("somebody-else", &session.id)
        .await
        .unwrap_err();
    assert!(matches!(delete, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_session_delete_cascades_messages() {
    let fixture = Fixture::new();
    let alice = fixture.seeded_user().await;

    let session = fixture
        .session_service
        .create(&alice.id, "Short-lived")
        .await
        .unwrap();

    for i in 0..5 {
        let message = ChatMessage::user(&session.id, &alice.id, &format!("message {}", i));
        fixture.messages.create(&message).await.unwrap();
    }
    assert_eq!(fixture.messages.count_by_session(&session.id).await.unwrap(), 5);

    fixture
        .session_service
        .delete(&alice.id, &session.id)
        .await
        .unwrap();

    assert_eq!(fixture.messages.count_by_session(&session.id).await.unwrap(), 0);
    assert!(fixture.sessions.get_by_id(&session.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_list_is_sorted_by_updated_at_desc() {
    let fixture = Fixture::new();
    let alice = fixture.seeded_user().await;
    let base: DateTime<Utc> = Utc::now();

    let mut newer = Session::new(&alice.id, "newer");
    newer.updated_at = base;
    fixture.sessions.create(&newer).await.unwrap();

    // 较旧的记录后插入，不应改变较新记录的报告顺序
    let mut older = Session::new(&alice.id, "older");
    older.updated_at = base - Duration::hours(2);
    fixture.sessions.create(&older).await.unwrap();

    let listed = fixture.session_service.list(&alice.id).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["newer", "older"]);
}

#[tokio::test]
async fn test_session_name_validation() {
    let fixture = Fixture::new();
    let alice = fixture.seeded_user().await;

    let empty = fixture.session_service.create(&alice.id, "").await.unwrap_err();
    assert!(matches!(empty, AppError::Validation(_)));

    let too_long = fixture
        .session_service
        .create(&alice.id, &"x".repeat(101))
        .await
        .unwrap_err();
    assert!(matches!(too_long, AppError::Validation(_)));
}

// ============ Memory round-trips ============

#[tokio::test]
async fn test_memory_roundtrip_respects_category_filter() {
    let fixture = Fixture::new();
    let alice = fixture.seeded_user().await;

    fixture
        .memory_service
        .create(&alice.id, "Prefers tea over coffee", MemoType::Core)
        .await
        .unwrap();
    fixture
        .memory_service
        .create(&alice.id, "Currently planning a trip", MemoType::Environment)
        .await
        .unwrap();

    let core = fixture
        .memory_service
        .list(&alice.id, Some(MemoType::Core))
        .await
        .unwrap();
    assert_eq!(core.len(), 1);
    assert_eq!(core[0].content, "Prefers tea over coffee");
    assert_eq!(core[0].memo_type, MemoType::Core);

    let environment = fixture
        .memory_service
        .list(&alice.id, Some(MemoType::Environment))
        .await
        .unwrap();
    assert_eq!(environment.len(), 1);
    assert!(environment.iter().all(|m| m.memo_type == MemoType::Environment));

    let all = fixture.memory_service.list(&alice.id, None).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_memory_list_is_sorted_newest_first() {
    let fixture = Fixture::new();
    let alice = fixture.seeded_user().await;
    let base: DateTime<Utc> = Utc::now();

    let mut newer = Memory::new(&alice.id, "newer fact", MemoType::Core);
    newer.created_at = base;
    fixture.memories.create(&newer).await.unwrap();

    let mut older = Memory::new(&alice.id, "older fact", MemoType::Core);
    older.created_at = base - Duration::days(1);
    fixture.memories.create(&older).await.unwrap();

    let listed = fixture
        .memory_service
        .list(&alice.id, Some(MemoType::Core))
        .await
        .unwrap();
    let contents: Vec<&str> = listed.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["newer fact", "older fact"]);
}

#[tokio::test]
async fn test_foreign_memory_is_not_found() {
    let fixture = Fixture::new();
    let alice = fixture.seeded_user().await;

    let memory = fixture
        .memory_service
        .create(&alice.id, "private fact", MemoType::Core)
        .await
        .unwrap();

    let foreign = fixture
        .memory_service
        .get("somebody-else", &memory.id)
        .await
        .unwrap_err();
    assert!(matches!(foreign, AppError::NotFound(_)));

    let delete = fixture
        .memory_service
        .delete("somebody-else", &memory.id)
        .await
        .unwrap_err();
    assert!(matches!(delete, AppError::NotFound(_)));
}

// ============ Conversation turns ============

#[tokio::test]
async fn test_turn_persists_user_and_bot_messages_in_order() {
    let fixture = Fixture::new();
    let alice = fixture.seeded_user().await;
    let session = fixture
        .session_service
        .create(&alice.id, "Trip Planning")
        .await
        .unwrap();

    let chat = fixture.chat_service(Arc::new(RecordingModel::default()));
    let bot = chat
        .submit_turn(&alice, &session.id, "What's the weather?", false)
        .await
        .unwrap();

    assert_eq!(bot.message_type, MessageType::Bot);
    assert_eq!(bot.model_used.as_deref(), Some("gemini-2.0-flash-lite"));
    assert_eq!(bot.reasoning, Some(false));

    let history = chat.history(&alice, &session.id, 50, 0).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].message_type, MessageType::User);
    assert_eq!(history[0].content, "What's the weather?");
    assert_eq!(history[1].message_type, MessageType::Bot);

    // 会话活跃时间被刷新
    let touched = fixture.sessions.get_by_id(&session.id).await.unwrap().unwrap();
    assert!(touched.last_message_at.is_some());
}

#[tokio::test]
async fn test_turn_injects_memories_into_prompt() {
    let fixture = Fixture::new();
    let alice = fixture.seeded_user().await;
    let session = fixture
        .session_service
        .create(&alice.id, "Trip Planning")
        .await
        .unwrap();

    fixture
        .memory_service
        .create(&alice.id, "Prefers metric units", MemoType::Core)
        .await
        .unwrap();
    fixture
        .memory_service
        .create(&alice.id, "Currently in Tokyo", MemoType::Environment)
        .await
        .unwrap();

    let model = Arc::new(RecordingModel::default());
    let chat = fixture.chat_service(model.clone());
    chat.submit_turn(&alice, &session.id, "What's the weather?", false)
        .await
        .unwrap();

    let calls = model.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (model_name, system_instruction, user_turn) = &calls[0];

    assert_eq!(model_name, "gemini-2.0-flash-lite");

    // 核心记忆进入系统指令
    assert!(system_instruction.contains("Core Memories:"));
    assert!(system_instruction.contains("Prefers metric units"));
    assert!(!system_instruction.contains("Currently in Tokyo"));

    // 环境记忆进入用户轮次，原始消息保持可见
    assert!(user_turn.contains("Environment/Event Memories:"));
    assert!(user_turn.contains("Currently in Tokyo"));
    assert!(user_turn.contains("User Query: What's the weather?"));
}

#[tokio::test]
async fn test_reasoning_flag_switches_model() {
    let fixture = Fixture::new();
    let alice = fixture.seeded_user().await;
    let session = fixture
        .session_service
        .create(&alice.id, "Deep thoughts")
        .await
        .unwrap();

    let model = Arc::new(RecordingModel::default());
    let chat = fixture.chat_service(model.clone());
    let bot = chat
        .submit_turn(&alice, &session.id, "Prove it.", true)
        .await
        .unwrap();

    assert_eq!(bot.model_used.as_deref(), Some("gemini-2.0-flash"));
    assert_eq!(bot.reasoning, Some(true));
    assert_eq!(model.calls.lock().unwrap()[0].0, "gemini-2.0-flash");
}

#[tokio::test]
async fn test_model_failure_degrades_to_persisted_error_message() {
    let fixture = Fixture::new();
    let alice = fixture.seeded_user().await;
    let session = fixture
        .session_service
        .create(&alice.id, "Trip Planning")
        .await
        .unwrap();

    let chat = fixture.chat_service(Arc::new(FailingModel));
    let bot = chat
        .submit_turn(&alice, &session.id, "What's the weather?", false)
        .await
        .expect("turn must succeed even when the model fails");

    assert_eq!(bot.message_type, MessageType::Bot);
    assert_eq!(bot.model_used.as_deref(), Some("error"));
    assert!(bot.content.contains("I'm sorry"));

    // 用户消息在模型调用前已落库，降级回复也被持久化
    let history = chat.history(&alice, &session.id, 50, 0).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].message_type, MessageType::User);
    assert_eq!(history[0].content, "What's the weather?");
    assert_eq!(history[1].model_used.as_deref(), Some("error"));
}

#[tokio::test]
async fn test_turn_against_foreign_session_is_not_found() {
    let fixture = Fixture::new();
    let alice = fixture.seeded_user().await;
    let session = fixture
        .session_service
        .create(&alice.id, "Private")
        .await
        .unwrap();

    let mallory = User::new("mallory", "mallory@example.com", "Mallory", "$hash");
    fixture.users.create(&mallory).await.unwrap();

    let chat = fixture.chat_service(Arc::new(RecordingModel::default()));
    let err = chat
        .submit_turn(&mallory, &session.id, "hello?", false)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));

    // 没有任何消息被写入
    assert_eq!(fixture.messages.count_by_session(&session.id).await.unwrap(), 0);
}

// ============ End-to-end flow ============

#[tokio::test]
async fn test_register_login_chat_flow() {
    let fixture = Fixture::new();

    // 注册 → 登录 → 令牌
    let user = fixture.seeded_user().await;
    let token = fixture
        .account_service
        .login("alice", "password123")
        .await
        .unwrap();

    let claims = fixture.jwt_auth.validate_token(&token).unwrap();
    assert_eq!(claims.sub, user.id);

    let current = fixture.account_service.current_user(&claims.sub).await.unwrap();
    assert_eq!(current.username, "alice");

    // 创建会话并提交一个轮次
    let session = fixture
        .session_service
        .create(&current.id, "Trip Planning")
        .await
        .unwrap();

    let chat = fixture.chat_service(Arc::new(RecordingModel::default()));
    let bot = chat
        .submit_turn(&current, &session.id, "What's the weather?", false)
        .await
        .unwrap();
    assert_eq!(bot.model_used.as_deref(), Some("gemini-2.0-flash-lite"));

    // 历史恰好是 (user, bot) 两条，按时间升序
    let history = chat.history(&current, &session.id, 50, 0).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].message_type, MessageType::User);
    assert_eq!(history[1].message_type, MessageType::Bot);
    assert!(history[0].timestamp <= history[1].timestamp);
}
