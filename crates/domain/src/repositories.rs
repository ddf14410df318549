//! 领域仓储抽象

use async_trait::async_trait;
use chrono::NaiveDate;
use tracker_core::TrackerResult;

use crate::entities::{NewTask, Task};

/// 任务仓储抽象
///
/// 所有列表查询均按日期升序并受 `limit` 限制。
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: &NewTask) -> TrackerResult<Task>;
    async fn find_by_id(&self, id: i64) -> TrackerResult<Option<Task>>;
    async fn list(&self, limit: u32) -> TrackerResult<Vec<Task>>;
    async fn find_by_date(&self, date: NaiveDate, limit: u32) -> TrackerResult<Vec<Task>>;
    /// 标题或备注包含 `pattern` 的任务
    async fn search(&self, pattern: &str, limit: u32) -> TrackerResult<Vec<Task>>;
    /// 返回是否存在并更新了该任务
    async fn update(&self, task: &Task) -> TrackerResult<bool>;
    async fn delete(&self, id: i64) -> TrackerResult<bool>;
}
