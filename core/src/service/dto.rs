use serde::{Serialize, Deserialize};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::model::task::{Task, TaskKind, TaskStatus};

/// Flattened view of a task for tables and listings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskDto {
    pub id: Uuid,
    pub short_id: String,
    pub text: String,
    pub kind: String, // "daily" | "one-time"
    pub status: TaskStatus,
    pub streak: Option<u32>,
    pub due_date: Option<NaiveDate>,
    pub last_completed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TaskDto {
    pub fn from_entity(task: &Task, now: DateTime<Utc>) -> Self {
        let (kind, streak) = match &task.kind {
            TaskKind::OneTime { .. } => ("one-time", None),
            TaskKind::Daily { streak, .. } => ("daily", Some(*streak)),
        };
        let id_str = task.id.to_string();

        Self {
            id: task.id,
            short_id: id_str[..8].to_string(),
            text: task.text.clone(),
            kind: kind.to_string(),
            status: task.status(now),
            streak,
            due_date: task.due_date(),
            last_completed: task.last_completed(),
            created_at: task.created_at,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}
