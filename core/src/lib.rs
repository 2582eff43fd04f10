pub mod config;
pub mod model;
pub mod repository;
pub mod input;
pub mod time;
pub mod service;
pub mod usecase;

pub use config::Config;
pub use model::task::{Task, TaskKind, TaskStatus, NewTask, NewTaskKind, TaskPatch};
pub use model::profile::{UserProfile, ProfilePatch};
pub use model::achievement::{Achievement, TaskStats, ACHIEVEMENTS};
pub use repository::{
    AuthProvider, FileProfileRepository, FileSessionProvider, FileTaskRepository, ProfileRepository,
    Subscription, TaskRepository,
};
pub use input::{parse_args, expand_key, new_task_from_args, task_edit_from_args, ParsedInput, TaskEdit};
pub use time::{same_day, parse_due_date};
pub use service::task_service::{TaskService, CompletionReport};
pub use service::profile_service::ProfileService;
pub use service::completion::{evaluate_completion, Completion};
pub use service::achievements::{evaluate_achievements, task_stats};
pub use service::query::{select, select_grouped, SortStrategy, TaskFilter, TaskGroups};
pub use service::dto::TaskDto;
pub use usecase::report::{bucket, Bucket, Granularity};
