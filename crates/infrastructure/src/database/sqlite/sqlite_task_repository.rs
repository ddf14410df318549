use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, instrument};
use tracker_core::{TrackerError, TrackerResult};
use tracker_domain::{
    entities::{NewTask, Task},
    recurrence::{format_date, parse_date},
    repositories::TaskRepository,
};

const SELECT_COLUMNS: &str = "SELECT id, date, title, comment, repeat FROM scheduler";

pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_task(row: &SqliteRow) -> TrackerResult<Task> {
        let raw_date: String = row.try_get("date")?;
        let date = parse_date(&raw_date).map_err(|e| {
            TrackerError::database_error(format!("scheduler 表中存在无效日期: {e}"))
        })?;

        Ok(Task {
            id: row.try_get("id")?,
            date,
            title: row.try_get("title")?,
            comment: row.try_get("comment")?,
            repeat: row.try_get("repeat")?,
        })
    }

    fn rows_to_tasks(rows: &[SqliteRow]) -> TrackerResult<Vec<Task>> {
        rows.iter().map(Self::row_to_task).collect()
    }
}

/// 转义 LIKE 通配符，使搜索词按字面匹配
fn like_pattern(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len() + 2);
    escaped.push('%');
    for ch in pattern.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    #[instrument(skip(self, task), fields(title = %task.title))]
    async fn create(&self, task: &NewTask) -> TrackerResult<Task> {
        let result = sqlx::query(
            "INSERT INTO scheduler (date, title, comment, repeat) VALUES (?, ?, ?, ?)",
        )
        .bind(format_date(task.date))
        .bind(&task.title)
        .bind(&task.comment)
        .bind(&task.repeat)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "任务已写入");
        Ok(task.clone().into_task(id))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> TrackerResult<Option<Task>> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_task).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: u32) -> TrackerResult<Vec<Task>> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY date, id LIMIT ?"))
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        Self::rows_to_tasks(&rows)
    }

    #[instrument(skip(self))]
    async fn find_by_date(&self, date: NaiveDate, limit: u32) -> TrackerResult<Vec<Task>> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE date = ? ORDER BY id LIMIT ?"
        ))
        .bind(format_date(date))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Self::rows_to_tasks(&rows)
    }

    #[instrument(skip(self))]
    async fn search(&self, pattern: &str, limit: u32) -> TrackerResult<Vec<Task>> {
        let like = like_pattern(pattern);
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE title LIKE ?1 ESCAPE '\\' OR comment LIKE ?1 ESCAPE '\\' \
             ORDER BY date, id LIMIT ?2"
        ))
        .bind(like)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Self::rows_to_tasks(&rows)
    }

    #[instrument(skip(self, task), fields(id = task.id))]
    async fn update(&self, task: &Task) -> TrackerResult<bool> {
        let result = sqlx::query(
            "UPDATE scheduler SET date = ?, title = ?, comment = ?, repeat = ? WHERE id = ?",
        )
        .bind(format_date(task.date))
        .bind(&task.title)
        .bind(&task.comment)
        .bind(&task.repeat)
        .bind(task.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> TrackerResult<bool> {
        let result = sqlx::query("DELETE FROM scheduler WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
