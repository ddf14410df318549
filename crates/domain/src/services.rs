//! # 任务服务
//!
//! 封装任务的增删改查与完成流程。服务本身无状态，
//! 通过 [`TaskRepository`] 访问数据，重复规则的计算委托给
//! [`recurrence`](crate::recurrence) 模块。
//!
//! ## 完成任务
//!
//! - 一次性任务（`repeat` 为空）：直接删除
//! - 重复任务：以今天的次日为 `now` 计算下一次日期并写回。
//!   日期不晚于今天的任务被顺延到今天之后，未来日期的任务保持不变

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};
use tracker_core::{TrackerError, TrackerResult};

use crate::entities::{NewTask, Task, TaskFilter};
use crate::recurrence::{self, RecurrenceRule};
use crate::repositories::TaskRepository;

pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
    list_limit: u32,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>, list_limit: u32) -> Self {
        Self {
            repository,
            list_limit,
        }
    }

    /// 创建任务
    #[instrument(skip(self, task), fields(title = %task.title))]
    pub async fn register(&self, task: NewTask) -> TrackerResult<Task> {
        validate_fields(&task.title, &task.repeat)?;

        let created = self.repository.create(&task).await?;
        info!(id = created.id, "创建任务成功");
        Ok(created)
    }

    pub async fn task(&self, id: i64) -> TrackerResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::task_not_found(id))
    }

    /// 查询任务列表，`search` 见 [`TaskFilter::from_search`]
    pub async fn tasks(&self, search: Option<&str>) -> TrackerResult<Vec<Task>> {
        let filter = TaskFilter::from_search(search);
        debug!(?filter, limit = self.list_limit, "查询任务列表");

        match filter {
            TaskFilter::All => self.repository.list(self.list_limit).await,
            TaskFilter::Date(date) => self.repository.find_by_date(date, self.list_limit).await,
            TaskFilter::Text(pattern) => self.repository.search(&pattern, self.list_limit).await,
        }
    }

    #[instrument(skip(self, task), fields(id = task.id))]
    pub async fn update(&self, task: Task) -> TrackerResult<Task> {
        validate_fields(&task.title, &task.repeat)?;

        if !self.repository.update(&task).await? {
            return Err(TrackerError::task_not_found(task.id));
        }

        info!("更新任务成功");
        Ok(task)
    }

    pub async fn delete(&self, id: i64) -> TrackerResult<()> {
        if !self.repository.delete(id).await? {
            return Err(TrackerError::task_not_found(id));
        }

        info!(id, "删除任务成功");
        Ok(())
    }

    /// 完成任务。返回重复任务的新状态；一次性任务被删除时返回 `None`
    #[instrument(skip(self))]
    pub async fn complete(&self, id: i64, today: NaiveDate) -> TrackerResult<Option<Task>> {
        let task = self.task(id).await?;

        if !task.is_recurring() {
            self.delete(id).await?;
            info!("一次性任务已完成并删除");
            return Ok(None);
        }

        // 以“今天之后”为起点：日期为今天的任务顺延，未来日期保持不变
        let now = today
            .succ_opt()
            .ok_or_else(|| TrackerError::InvalidDate(recurrence::format_date(today)))?;
        let next = recurrence::next_date(now, task.date, &task.repeat)?;

        let updated = Task { date: next, ..task };
        if !self.repository.update(&updated).await? {
            return Err(TrackerError::task_not_found(id));
        }

        info!(next_date = %recurrence::format_date(next), "重复任务已顺延");
        Ok(Some(updated))
    }

    /// 计算下一次日期，结果为 `YYYYMMDD`
    pub fn next_date(&self, now: NaiveDate, anchor: NaiveDate, repeat: &str) -> TrackerResult<String> {
        Ok(recurrence::compute_next_date(now, anchor, repeat)?)
    }
}

fn validate_fields(title: &str, repeat: &str) -> TrackerResult<()> {
    if title.trim().is_empty() {
        return Err(TrackerError::validation("任务标题不能为空"));
    }

    if !repeat.is_empty() {
        RecurrenceRule::parse(repeat)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    // Mock TaskRepository for testing
    #[derive(Default)]
    struct MockTaskRepository {
        tasks: Mutex<BTreeMap<i64, Task>>,
    }

    impl MockTaskRepository {
        fn with_tasks(tasks: Vec<Task>) -> Self {
            Self {
                tasks: Mutex::new(tasks.into_iter().map(|t| (t.id, t)).collect()),
            }
        }

        fn sorted(&self, limit: u32, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
            let mut tasks: Vec<Task> = self
                .tasks
                .lock()
                .unwrap()
                .values()
                .filter(|t| keep(t))
                .cloned()
                .collect();
            tasks.sort_by_key(|t| t.date);
            tasks.truncate(limit as usize);
            tasks
        }
    }

    #[async_trait]
    impl TaskRepository for MockTaskRepository {
        async fn create(&self, task: &NewTask) -> TrackerResult<Task> {
            let mut tasks = self.tasks.lock().unwrap();
            let id = tasks.keys().next_back().copied().unwrap_or(0) + 1;
            let created = task.clone().into_task(id);
            tasks.insert(id, created.clone());
            Ok(created)
        }

        async fn find_by_id(&self, id: i64) -> TrackerResult<Option<Task>> {
            Ok(self.tasks.lock().unwrap().get(&id).cloned())
        }

        async fn list(&self, limit: u32) -> TrackerResult<Vec<Task>> {
            Ok(self.sorted(limit, |_| true))
        }

        async fn find_by_date(&self, date: NaiveDate, limit: u32) -> TrackerResult<Vec<Task>> {
            Ok(self.sorted(limit, |t| t.date == date))
        }

        async fn search(&self, pattern: &str, limit: u32) -> TrackerResult<Vec<Task>> {
            Ok(self.sorted(limit, |t| {
                t.title.contains(pattern) || t.comment.contains(pattern)
            }))
        }

        async fn update(&self, task: &Task) -> TrackerResult<bool> {
            let mut tasks = self.tasks.lock().unwrap();
            match tasks.get_mut(&task.id) {
                Some(existing) => {
                    *existing = task.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: i64) -> TrackerResult<bool> {
            Ok(self.tasks.lock().unwrap().remove(&id).is_some())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: i64, date: NaiveDate, title: &str, repeat: &str) -> Task {
        Task {
            id,
            date,
            title: title.to_string(),
            comment: String::new(),
            repeat: repeat.to_string(),
        }
    }

    fn service(tasks: Vec<Task>) -> (TaskService, Arc<MockTaskRepository>) {
        let repo = Arc::new(MockTaskRepository::with_tasks(tasks));
        (TaskService::new(repo.clone(), 50), repo)
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let (service, _) = service(vec![]);

        let new_task = NewTask {
            date: date(2024, 1, 26),
            title: "Купить хлеб".to_string(),
            comment: String::new(),
            repeat: "d 1".to_string(),
        };
        let created = service.register(new_task.clone()).await.unwrap();
        assert_eq!(created.id, 1);

        let blank_title = NewTask {
            title: "   ".to_string(),
            ..new_task.clone()
        };
        assert!(matches!(
            service.register(blank_title).await,
            Err(TrackerError::ValidationError(_))
        ));

        let bad_repeat = NewTask {
            repeat: "d 401".to_string(),
            ..new_task
        };
        assert!(matches!(
            service.register(bad_repeat).await,
            Err(TrackerError::InvalidRepeatRule { .. })
        ));
    }

    #[tokio::test]
    async fn test_task_not_found() {
        let (service, _) = service(vec![]);
        assert!(matches!(
            service.task(9).await,
            Err(TrackerError::TaskNotFound { id: 9 })
        ));
        assert!(matches!(
            service.delete(9).await,
            Err(TrackerError::TaskNotFound { id: 9 })
        ));
        assert!(matches!(
            service.update(task(9, date(2024, 1, 1), "x", "")).await,
            Err(TrackerError::TaskNotFound { id: 9 })
        ));
    }

    #[tokio::test]
    async fn test_tasks_dispatches_filter() {
        let (service, _) = service(vec![
            task(1, date(2024, 2, 8), "Бассейн", ""),
            task(2, date(2024, 1, 30), "Фитнес", "w 2,4"),
            task(3, date(2024, 2, 8), "Отчёт", ""),
        ]);

        let all = service.tasks(None).await.unwrap();
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 1, 3]);

        let by_date = service.tasks(Some("08.02.2024")).await.unwrap();
        assert_eq!(by_date.len(), 2);

        let by_text = service.tasks(Some("Фит")).await.unwrap();
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].id, 2);
    }

    #[tokio::test]
    async fn test_complete_one_off_task_deletes_it() {
        let (service, repo) = service(vec![task(1, date(2024, 1, 26), "Позвонить", "")]);

        let result = service.complete(1, date(2024, 1, 26)).await.unwrap();
        assert!(result.is_none());
        assert!(repo.find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_complete_recurring_task_moves_past_today() {
        let (service, repo) = service(vec![
            task(1, date(2024, 1, 20), "Полить цветы", "d 3"),
            task(2, date(2024, 2, 10), "Отчёт", "d 5"),
            task(3, date(2024, 1, 26), "Зарядка", "w 5"),
        ]);
        let today = date(2024, 1, 26);

        // 20 + 3k > 26 -> 29
        let moved = service.complete(1, today).await.unwrap().unwrap();
        assert_eq!(moved.date, date(2024, 1, 29));
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().date, date(2024, 1, 29));

        // 日期在未来时保持原日期
        let kept = service.complete(2, today).await.unwrap().unwrap();
        assert_eq!(kept.date, date(2024, 2, 10));

        // 当天是周五，下一个周五
        let moved = service.complete(3, today).await.unwrap().unwrap();
        assert_eq!(moved.date, date(2024, 2, 2));
    }

    #[tokio::test]
    async fn test_complete_today_daily_task_advances_one_step() {
        let (service, _) = service(vec![task(1, date(2024, 1, 26), "Зарядка", "d 1")]);

        let moved = service.complete(1, date(2024, 1, 26)).await.unwrap().unwrap();
        assert_eq!(moved.date, date(2024, 1, 27));
    }

    #[tokio::test]
    async fn test_complete_rejects_date_beyond_year_9999() {
        let last = date(9999, 12, 31);
        let (service, repo) = service(vec![task(1, last, "Конец", "d 1")]);

        let result = service.complete(1, last).await;
        assert!(matches!(result, Err(TrackerError::ValidationError(_))));
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().date, last);
    }

    #[tokio::test]
    async fn test_complete_missing_task() {
        let (service, _) = service(vec![]);
        assert!(matches!(
            service.complete(5, date(2024, 1, 26)).await,
            Err(TrackerError::TaskNotFound { id: 5 })
        ));
    }

    #[test]
    fn test_next_date() {
        let (service, _) = service(vec![]);
        let now = date(2024, 1, 26);
        assert_eq!(
            service.next_date(now, date(2024, 1, 13), "d 7").unwrap(),
            "20240127"
        );
        assert!(matches!(
            service.next_date(now, date(2024, 1, 13), ""),
            Err(TrackerError::InvalidRepeatRule { .. })
        ));
    }
}
