//! SurrealDB 存储句柄
//!
//! 进程启动时构造一次的显式存储句柄，通过依赖注入传递给各仓储。
//! 连接失败或健康检查失败时，启动过程直接失败，绝不降级为静默空实现。

use crate::config::config::DatabaseConfig;
use crate::error::{AppError, Result};
use surrealdb::{
    Surreal,
    engine::any::{Any, connect},
    opt::auth::Root,
};

/// SurrealDB 存储句柄
#[derive(Clone)]
pub struct SurrealDb {
    db: Surreal<Any>,
}

impl SurrealDb {
    /// 连接数据库并执行健康检查
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db: Surreal<Any> = connect(&config.url)
            .await
            .map_err(|e| AppError::Connection(format!("Failed to connect to {}: {}", config.url, e)))?;

        // 认证
        db.signin(Root {
            username: &config.username,
            password: &config.password,
        })
        .await
        .map_err(|e| AppError::Connection(format!("Database authentication failed: {}", e)))?;

        // 选择命名空间和数据库
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| AppError::Connection(e.to_string()))?;

        // 显式健康检查：不可达的存储是致命错误
        db.health()
            .await
            .map_err(|e| AppError::Connection(format!("Database health check failed: {}", e)))?;

        Ok(Self { db })
    }

    /// 定义唯一索引和查询索引
    pub async fn define_indexes(&self) -> Result<()> {
        self.db
            .query(
                "
                DEFINE INDEX IF NOT EXISTS user_email ON TABLE user COLUMNS email UNIQUE;
                DEFINE INDEX IF NOT EXISTS user_username ON TABLE user COLUMNS username UNIQUE;
                DEFINE INDEX IF NOT EXISTS session_user ON TABLE session COLUMNS user_id;
                DEFINE INDEX IF NOT EXISTS memory_user ON TABLE memory COLUMNS user_id;
                DEFINE INDEX IF NOT EXISTS memory_user_type ON TABLE memory COLUMNS user_id, memo_type;
                DEFINE INDEX IF NOT EXISTS chat_message_session_ts ON TABLE chat_message COLUMNS session_id, timestamp;
                ",
            )
            .await?;
        Ok(())
    }

    /// 获取内部数据库实例
    pub fn inner(&self) -> Surreal<Any> {
        self.db.clone()
    }
}
