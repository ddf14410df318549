use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};
use tracker_core::TrackerError;
use tracker_domain::RuleError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("业务错误: {0}")]
    Tracker(#[from] TrackerError),

    #[error("重复规则错误: {0}")]
    Rule(#[from] RuleError),

    #[error("验证错误: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("请求参数错误: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, String, &'static str) {
        match self {
            ApiError::Tracker(TrackerError::TaskNotFound { id }) => (
                StatusCode::NOT_FOUND,
                format!("任务 ID {id} 不存在"),
                "TASK_NOT_FOUND",
            ),
            ApiError::Tracker(TrackerError::InvalidRepeatRule { rule, message }) if rule.is_empty() => (
                StatusCode::BAD_REQUEST,
                format!("重复规则不能为空: {message}"),
                "EMPTY_REPEAT_RULE",
            ),
            ApiError::Tracker(TrackerError::InvalidRepeatRule { rule, message }) => (
                StatusCode::BAD_REQUEST,
                format!("重复规则 '{rule}' 无效: {message}"),
                "INVALID_REPEAT_RULE",
            ),
            ApiError::Tracker(TrackerError::InvalidDate(input)) => (
                StatusCode::BAD_REQUEST,
                format!("日期 '{input}' 无效，应为 YYYYMMDD"),
                "INVALID_DATE",
            ),
            ApiError::Tracker(TrackerError::ValidationError(msg)) => (
                StatusCode::BAD_REQUEST,
                format!("请求参数验证失败: {msg}"),
                "VALIDATION_ERROR",
            ),
            ApiError::Tracker(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "系统内部错误".to_string(),
                "INTERNAL_ERROR",
            ),
            ApiError::Rule(err) => {
                let error_type = match err {
                    RuleError::Empty => "EMPTY_REPEAT_RULE",
                    RuleError::InvalidFormat { .. } => "INVALID_REPEAT_RULE",
                    RuleError::OutOfRange { .. } => "VALIDATION_ERROR",
                };
                (StatusCode::BAD_REQUEST, err.to_string(), error_type)
            }
            ApiError::Validation(errors) => {
                let mut details: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .map(|(field, errors)| {
                        let messages: Vec<String> = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| "验证失败".to_string())
                            })
                            .collect();
                        format!("{}: {}", field, messages.join(", "))
                    })
                    .collect();
                details.sort();

                (
                    StatusCode::BAD_REQUEST,
                    format!("请求参数验证失败: {}", details.join("; ")),
                    "VALIDATION_ERROR",
                )
            }
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                format!("请求参数错误: {msg}"),
                "BAD_REQUEST",
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, error_type) = self.parts();

        if status.is_server_error() {
            error!(error = %self, "请求处理失败");
        } else {
            warn!(error = %self, "请求被拒绝");
        }

        let body = Json(json!({
            "error": {
                "message": message,
                "type": error_type,
                "code": status.as_u16(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_domain::RecurrenceRule;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn test_api_error_tracker_error_conversion() {
        let api_error: ApiError = TrackerError::task_not_found(123).into();

        match api_error {
            ApiError::Tracker(TrackerError::TaskNotFound { id }) => assert_eq!(id, 123),
            _ => panic!("Expected TrackerError::TaskNotFound"),
        }
    }

    #[test]
    fn test_api_error_into_response_not_found() {
        let response = ApiError::Tracker(TrackerError::task_not_found(1)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_api_error_into_response_bad_request() {
        let response = ApiError::BadRequest("Invalid parameter".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let rule_error = RecurrenceRule::parse("w 8").unwrap_err();
        assert_eq!(
            ApiError::from(rule_error).into_response().status(),
            StatusCode::BAD_REQUEST
        );

        let response = ApiError::Tracker(TrackerError::InvalidDate("x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_empty_rule_has_its_own_type() {
        let (status, _, error_type) = ApiError::from(TrackerError::from(RuleError::Empty)).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_type, "EMPTY_REPEAT_RULE");

        let (_, _, error_type) = ApiError::from(RuleError::Empty).parts();
        assert_eq!(error_type, "EMPTY_REPEAT_RULE");

        let malformed = RecurrenceRule::parse("w 8").unwrap_err();
        let (_, _, error_type) = ApiError::from(TrackerError::from(malformed.clone())).parts();
        assert_eq!(error_type, "INVALID_REPEAT_RULE");
        let (_, _, error_type) = ApiError::from(malformed).parts();
        assert_eq!(error_type, "INVALID_REPEAT_RULE");
    }

    #[test]
    fn test_out_of_range_result_is_validation_error() {
        let err = RuleError::OutOfRange {
            rule: "d 7".to_string(),
        };
        let (status, message, error_type) = ApiError::from(TrackerError::from(err)).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_type, "VALIDATION_ERROR");
        assert!(message.contains("9999"));
    }

    #[test]
    fn test_api_error_into_response_validation() {
        let mut errors = ValidationErrors::new();
        errors.add("title", ValidationError::new("title_empty"));

        let (status, message, error_type) = ApiError::Validation(errors).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_type, "VALIDATION_ERROR");
        assert!(message.contains("title"));
    }

    #[test]
    fn test_api_error_into_response_internal() {
        let error = ApiError::Tracker(TrackerError::database_error("disk I/O error"));
        let (status, message, _) = error.parts();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        // 内部细节不暴露给调用方
        assert!(!message.contains("disk"));
    }
}
