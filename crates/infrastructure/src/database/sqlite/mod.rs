pub mod sqlite_task_repository;

pub use sqlite_task_repository::SqliteTaskRepository;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};
use tracker_core::config::DatabaseConfig;
use tracker_core::TrackerResult;
use tracker_domain::TaskRepository;

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// 数据库表结构，启动时幂等执行
const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS scheduler (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date CHAR(8) NOT NULL,
        title TEXT NOT NULL,
        comment TEXT NOT NULL DEFAULT '',
        repeat VARCHAR(128) NOT NULL DEFAULT ''
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_scheduler_date ON scheduler(date)",
];

pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    /// 按配置建立连接池并初始化表结构
    pub async fn new(config: &DatabaseConfig) -> TrackerResult<Self> {
        if config.url.contains(":memory:") {
            return Self::in_memory().await;
        }

        let connect_options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .connect_with(connect_options)
            .await?;

        info!(url = %config.url, "数据库连接池已创建");

        let manager = Self { pool };
        manager.migrate().await?;
        Ok(manager)
    }

    /// 内存数据库，仅保留一个永不回收的连接，否则每个连接各自是一份空库
    pub async fn in_memory() -> TrackerResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str(IN_MEMORY_URL)?)
            .await?;

        let manager = Self { pool };
        manager.migrate().await?;
        Ok(manager)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> TrackerResult<()> {
        debug!("Running SQLite database migrations");

        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        debug!("Successfully completed SQLite database migrations");
        Ok(())
    }

    pub fn task_repository(&self) -> Arc<dyn TaskRepository> {
        Arc::new(SqliteTaskRepository::new(self.pool.clone()))
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("数据库连接池已关闭");
    }
}
