use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;
use tracker_api::create_app;
use tracker_core::AppConfig;
use tracker_domain::TaskService;
use tracker_infrastructure::DatabaseManager;

/// 主应用程序
pub struct Application {
    config: AppConfig,
    database: DatabaseManager,
    task_service: Arc<TaskService>,
}

impl Application {
    /// 打开数据库并组装服务
    pub async fn new(config: AppConfig) -> Result<Self> {
        info!(database = %config.database.url, "初始化应用程序");

        let database = DatabaseManager::new(&config.database)
            .await
            .with_context(|| format!("打开数据库失败: {}", config.database.url))?;

        let task_service = Arc::new(TaskService::new(
            database.task_repository(),
            config.database.list_limit,
        ));

        Ok(Self {
            config,
            database,
            task_service,
        })
    }

    pub fn router(&self) -> Router {
        create_app(Arc::clone(&self.task_service), &self.config.api)
    }

    /// 绑定配置中的地址并运行，直到收到关闭信号
    pub async fn run(&self, shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let bind_address = &self.config.api.bind_address;
        let listener = TcpListener::bind(bind_address)
            .await
            .with_context(|| format!("绑定地址失败: {bind_address}"))?;

        self.serve(listener, shutdown_rx).await
    }

    /// 在给定的监听器上提供服务，关闭后释放数据库连接
    pub async fn serve(
        &self,
        listener: TcpListener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<()> {
        let local_addr = listener.local_addr().context("读取监听地址失败")?;
        info!("API服务器启动在 http://{local_addr}");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("API服务器收到关闭信号");
            })
            .await
            .context("API服务器运行失败")?;

        self.database.close().await;
        info!("API服务器已停止");
        Ok(())
    }
}
