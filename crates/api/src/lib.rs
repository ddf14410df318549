//! # Task Tracker API
//!
//! 基于 Axum 的 REST 接口，日期统一使用 `YYYYMMDD` 字符串。
//!
//! ## API 端点
//!
//! - `GET /api/nextdate?now=&date=&repeat=` - 计算重复任务的下一次日期
//! - `POST /api/task` - 创建任务
//! - `GET /api/task?id=` - 获取任务详情
//! - `PUT /api/task` - 更新任务
//! - `DELETE /api/task?id=` - 删除任务
//! - `POST /api/task/done?id=` - 完成任务
//! - `GET /api/tasks?search=` - 任务列表，`search` 为 `DD.MM.YYYY` 时按日期筛选
//! - `GET /health` - 健康检查
//!
//! ## 错误响应
//!
//! ```json
//! {
//!   "error": {
//!     "message": "任务 ID 7 不存在",
//!     "type": "TASK_NOT_FOUND",
//!     "code": 404,
//!     "timestamp": "2024-01-26T00:00:00+00:00"
//!   }
//! }
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod validation;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tracing::info;
use tracker_core::config::ApiConfig;
use tracker_domain::TaskService;

use middleware::{cors_layer, request_logging, timeout_layer, trace_layer};
use routes::{create_routes, AppState};

/// 创建完整的API应用
pub fn create_app(task_service: Arc<TaskService>, api_config: &ApiConfig) -> Router {
    let state = AppState { task_service };
    let mut router = create_routes(state);

    if let Some(web_dir) = &api_config.web_dir {
        info!(web_dir = %web_dir, "挂载静态文件目录");
        router = router.fallback_service(ServeDir::new(web_dir));
    }

    router = router.layer(timeout_layer(api_config.request_timeout_seconds));
    if api_config.cors_enabled {
        router = router.layer(cors_layer());
    }

    router.layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(axum::middleware::from_fn(request_logging)),
    )
}
