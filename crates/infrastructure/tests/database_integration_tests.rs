use chrono::NaiveDate;
use tracker_core::config::DatabaseConfig;
use tracker_domain::{NewTask, Task};
use tracker_infrastructure::DatabaseManager;

fn file_config(dir: &tempfile::TempDir) -> DatabaseConfig {
    DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("scheduler.db").display()),
        ..DatabaseConfig::default()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_tasks_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir);

    let created = {
        let manager = DatabaseManager::new(&config).await.unwrap();
        let repo = manager.task_repository();
        let task = repo
            .create(&NewTask {
                date: date(2024, 1, 26),
                title: "Полить цветы".to_string(),
                comment: String::new(),
                repeat: "d 3".to_string(),
            })
            .await
            .unwrap();
        manager.close().await;
        task
    };

    // 重新打开时表结构已存在，迁移不应破坏数据
    let manager = DatabaseManager::new(&config).await.unwrap();
    let repo = manager.task_repository();
    let found = repo.find_by_id(created.id).await.unwrap();
    assert_eq!(found, Some(created.clone()));

    let tasks = repo.list(10).await.unwrap();
    assert_eq!(tasks, vec![created]);
    manager.close().await;
}

#[tokio::test]
async fn test_schema_objects_exist() {
    let dir = tempfile::tempdir().unwrap();
    let manager = DatabaseManager::new(&file_config(&dir)).await.unwrap();

    let names: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE name IN ('scheduler', 'idx_scheduler_date') ORDER BY name",
    )
    .fetch_all(manager.pool())
    .await
    .unwrap();

    assert_eq!(names, vec!["idx_scheduler_date", "scheduler"]);
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let manager = DatabaseManager::in_memory().await.unwrap();
    let repo = manager.task_repository();

    let new_task = NewTask {
        date: date(2024, 1, 26),
        title: "Разовая задача".to_string(),
        comment: String::new(),
        repeat: String::new(),
    };

    let first = repo.create(&new_task).await.unwrap();
    assert!(repo.delete(first.id).await.unwrap());
    let second = repo.create(&new_task).await.unwrap();

    assert!(second.id > first.id);
    assert!(!repo.delete(first.id).await.unwrap());

    let updated = Task {
        title: "Изменённая".to_string(),
        ..second.clone()
    };
    assert!(repo.update(&updated).await.unwrap());
    assert_eq!(repo.find_by_id(second.id).await.unwrap(), Some(updated));
}
