use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tracker_domain::TaskService;

use crate::handlers::{
    health::health_check,
    nextdate::next_date,
    tasks::{complete_task, create_task, delete_task, get_task, list_tasks, update_task},
};

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub task_service: Arc<TaskService>,
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 日期计算
        .route("/api/nextdate", get(next_date))
        // 任务管理API
        .route(
            "/api/task",
            get(get_task)
                .post(create_task)
                .put(update_task)
                .delete(delete_task),
        )
        .route("/api/task/done", post(complete_task))
        .route("/api/tasks", get(list_tasks))
        .with_state(state)
}
