use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::recurrence::yyyymmdd;

/// 待办任务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(with = "yyyymmdd")]
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    /// 重复规则，为空表示一次性任务
    #[serde(default)]
    pub repeat: String,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        !self.repeat.is_empty()
    }
}

/// 尚未持久化的任务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    #[serde(with = "yyyymmdd")]
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub repeat: String,
}

impl NewTask {
    pub fn into_task(self, id: i64) -> Task {
        Task {
            id,
            date: self.date,
            title: self.title,
            comment: self.comment,
            repeat: self.repeat,
        }
    }
}

/// 任务列表的筛选条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    /// 搜索词形如 `DD.MM.YYYY` 时按日期精确匹配
    Date(NaiveDate),
    /// 标题或备注包含该子串
    Text(String),
}

impl TaskFilter {
    pub const SEARCH_DATE_LAYOUT: &'static str = "%d.%m.%Y";

    pub fn from_search(search: Option<&str>) -> Self {
        let search = match search.map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => return TaskFilter::All,
        };

        match NaiveDate::parse_from_str(search, Self::SEARCH_DATE_LAYOUT) {
            Ok(date) => TaskFilter::Date(date),
            Err(_) => TaskFilter::Text(search.to_string()),
        }
    }
}
