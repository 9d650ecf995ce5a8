use serde::{Deserialize, Serialize};

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SurrealDB 连接地址
    pub url: String,
    /// 命名空间
    pub namespace: String,
    /// 数据库名称
    pub database: String,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
}

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT 签名密钥
    pub jwt_secret: String,
    /// JWT 签发者
    pub jwt_issuer: String,
    /// 访问令牌有效期（分钟）
    pub token_ttl_minutes: u64,
}

/// 语言模型配置
///
/// `api_key` 缺失不会阻止进程启动：模型客户端会以降级模式运行，
/// 每个对话轮次返回一条说明问题的机器人消息。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    /// 模型服务 API Key
    pub api_key: Option<String>,
    /// 模型服务基础地址
    pub base_url: String,
    /// 推理模型标识（reasoning=true 时使用）
    pub reasoning_model: String,
    /// 默认模型标识
    pub default_model: String,
    /// 单次调用超时（秒）
    pub request_timeout: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 服务器配置
    pub server: ServerConfig,
    /// 认证配置
    pub auth: AuthConfig,
    /// 语言模型配置
    pub model: ModelConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            database: DatabaseConfig {
                url: "ws://localhost:8000".into(),
                namespace: "mnemos".into(),
                database: "chatbot".into(),
                username: "root".into(),
                password: "root".into(),
            },
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8080,
            },
            auth: AuthConfig {
                jwt_secret: "dev-secret-change-in-production-min-32-chars".into(),
                jwt_issuer: "mnemos".into(),
                token_ttl_minutes: 60 * 24,
            },
            model: ModelConfig {
                api_key: None,
                base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
                reasoning_model: "gemini-2.0-flash".into(),
                default_model: "gemini-2.0-flash-lite".into(),
                request_timeout: 30,
            },
            logging: LoggingConfig {
                level: "debug".into(),
                structured: true,
            },
            app_name: "mnemos".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config
    }
}
