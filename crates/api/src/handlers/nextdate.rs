use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
};
use tracing::debug;
use tracker_core::TrackerError;
use tracker_domain::recurrence::parse_date;
use validator::Validate;

use crate::{
    error::ApiResult,
    response::{success, NextDateResponse},
    routes::AppState,
    validation::task::NextDateQuery,
};

/// 计算下一次日期：`GET /api/nextdate?now=&date=&repeat=`
pub async fn next_date(
    State(state): State<AppState>,
    query: Result<Query<NextDateQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    query.validate()?;

    let now = parse_date(&query.now).map_err(TrackerError::from)?;
    let anchor = parse_date(&query.date).map_err(TrackerError::from)?;

    let nextdate = state.task_service.next_date(now, anchor, &query.repeat)?;
    debug!(now = %query.now, date = %query.date, repeat = %query.repeat, %nextdate, "计算下一次日期");

    Ok(success(NextDateResponse { nextdate }))
}
