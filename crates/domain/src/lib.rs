pub mod entities;
pub mod errors;
pub mod recurrence;
pub mod repositories;
pub mod services;

pub use entities::{NewTask, Task, TaskFilter};
pub use recurrence::{compute_next_date, next_date, RecurrenceRule, RuleError};
pub use repositories::TaskRepository;
pub use services::TaskService;
pub use tracker_core::{TrackerError, TrackerResult};
