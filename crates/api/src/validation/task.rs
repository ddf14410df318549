use std::borrow::Cow;

use serde::Deserialize;
use tracker_domain::recurrence::{parse_date, RecurrenceRule, RuleError};
use validator::{Validate, ValidationError};

use crate::error::ApiError;

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// 验证日期为 `YYYYMMDD`
pub fn validate_date(date: &str) -> Result<(), ValidationError> {
    parse_date(date)
        .map(|_| ())
        .map_err(|_| error("date_format", "日期格式必须为 YYYYMMDD"))
}

/// 验证任务标题非空
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(error("title_empty", "任务标题不能为空"));
    }
    Ok(())
}

/// 验证重复规则：允许为空，否则必须能被解析
pub fn validate_repeat(repeat: &str) -> Result<(), ValidationError> {
    match RecurrenceRule::parse(repeat) {
        Ok(_) | Err(RuleError::Empty) => Ok(()),
        Err(e) => Err(error("repeat_format", e.to_string())),
    }
}

/// 验证任务ID为正整数字符串
pub fn validate_id(id: &str) -> Result<(), ValidationError> {
    match id.parse::<i64>() {
        Ok(value) if value > 0 => Ok(()),
        _ => Err(error("id_format", "任务ID必须为正整数")),
    }
}

/// 解析查询参数中的任务ID
pub fn parse_task_id(raw: Option<&str>) -> Result<i64, ApiError> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("缺少任务ID".to_string()))?;

    validate_id(raw).map_err(|_| ApiError::BadRequest(format!("无效的任务ID: {raw}")))?;
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("无效的任务ID: {raw}")))
}

/// 创建任务请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    #[validate(custom(function = "validate_repeat"))]
    pub repeat: String,
}

/// 更新任务请求，`id` 与读取接口一致以字符串传递
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(custom(function = "validate_id"))]
    pub id: String,
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    #[validate(custom(function = "validate_repeat"))]
    pub repeat: String,
}

/// `/api/nextdate` 查询参数
#[derive(Debug, Deserialize, Validate)]
pub struct NextDateQuery {
    #[serde(default)]
    #[validate(custom(function = "validate_date"))]
    pub now: String,
    #[serde(default)]
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    #[serde(default)]
    pub repeat: String,
}
