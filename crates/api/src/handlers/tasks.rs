use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use tracing::info;
use tracker_core::TrackerError;
use tracker_domain::{recurrence::parse_date, NewTask, Task};
use validator::Validate;

use crate::{
    error::ApiResult,
    response::{created, success, Empty, IdResponse, TaskResponse, TasksResponse},
    routes::AppState,
    validation::task::{parse_task_id, CreateTaskRequest, UpdateTaskRequest},
};

/// `?id=` 查询参数
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// 任务列表查询参数
#[derive(Debug, Deserialize)]
pub struct TaskQueryParams {
    pub search: Option<String>,
}

/// 创建任务
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    request.validate()?;

    let new_task = NewTask {
        date: parse_date(&request.date).map_err(TrackerError::from)?,
        title: request.title,
        comment: request.comment,
        repeat: request.repeat,
    };

    let task = state.task_service.register(new_task).await?;
    Ok(created(IdResponse {
        id: task.id.to_string(),
    }))
}

/// 获取任务列表
pub async fn list_tasks(
    State(state): State<AppState>,
    params: Result<Query<TaskQueryParams>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = params?;

    let tasks = state.task_service.tasks(params.search.as_deref()).await?;
    Ok(success(TasksResponse {
        tasks: tasks.into_iter().map(TaskResponse::from).collect(),
    }))
}

/// 获取单个任务
pub async fn get_task(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let id = parse_task_id(query.id.as_deref())?;

    let task = state.task_service.task(id).await?;
    Ok(success(TaskResponse::from(task)))
}

/// 更新任务
pub async fn update_task(
    State(state): State<AppState>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    request.validate()?;

    let task = Task {
        id: parse_task_id(Some(&request.id))?,
        date: parse_date(&request.date).map_err(TrackerError::from)?,
        title: request.title,
        comment: request.comment,
        repeat: request.repeat,
    };

    state.task_service.update(task).await?;
    Ok(success(Empty::default()))
}

/// 删除任务
pub async fn delete_task(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let id = parse_task_id(query.id.as_deref())?;

    state.task_service.delete(id).await?;
    Ok(success(Empty::default()))
}

/// 完成任务：一次性任务删除，重复任务顺延到下一次日期
pub async fn complete_task(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let id = parse_task_id(query.id.as_deref())?;

    let today = Local::now().date_naive();
    if let Some(task) = state.task_service.complete(id, today).await? {
        info!(id, date = %task.date, "任务顺延");
    }

    Ok(success(Empty::default()))
}
