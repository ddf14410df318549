use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracker_domain::{recurrence::format_date, Task};

/// 任务的接口表示，`id` 与日期均以字符串传输
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: String,
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            date: format_date(task.date),
            title: task.title,
            comment: task.comment,
            repeat: task.repeat,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<TaskResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextDateResponse {
    pub nextdate: String,
}

/// 无内容的成功响应，序列化为 `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Empty {}

pub fn success<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(data))
}

pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_task_response_from_task() {
        let task = Task {
            id: 15,
            date: NaiveDate::from_ymd_opt(2024, 2, 8).unwrap(),
            title: "Бассейн".to_string(),
            comment: "с 9 до 10".to_string(),
            repeat: "w 4".to_string(),
        };

        let json = serde_json::to_value(TaskResponse::from(task)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "15",
                "date": "20240208",
                "title": "Бассейн",
                "comment": "с 9 до 10",
                "repeat": "w 4"
            })
        );
    }

    #[test]
    fn test_empty_serializes_to_object() {
        assert_eq!(serde_json::to_string(&Empty::default()).unwrap(), "{}");
    }

    #[test]
    fn test_status_helpers() {
        let response = success(Empty::default()).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = created(IdResponse { id: "1".to_string() }).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
