use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::time::same_day;

/// Variant-specific state. Serialized with a `type` tag so stored documents
/// read as `{"type": "daily", "streak": 3, ...}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TaskKind {
    OneTime {
        #[serde(default)]
        completed: bool,
        #[serde(default, rename = "dueDate")]
        due_date: Option<NaiveDate>,
    },
    Daily {
        #[serde(default)]
        streak: u32,
        #[serde(default, rename = "lastCompleted")]
        last_completed: Option<DateTime<Utc>>,
        // display only; streak math never reads it
        #[serde(default, rename = "completionHistory")]
        completion_history: BTreeSet<NaiveDate>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Active,
    Completed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: TaskKind,
}

impl Task {
    pub fn is_daily(&self) -> bool {
        matches!(self.kind, TaskKind::Daily { .. })
    }

    /// The single place completion status is derived.
    ///
    /// One-time tasks follow their `completed` flag. A daily habit counts as
    /// completed only while its last completion is on the same local day as `now`.
    pub fn status(&self, now: DateTime<Utc>) -> TaskStatus {
        let done = match &self.kind {
            TaskKind::OneTime { completed, .. } => *completed,
            TaskKind::Daily { last_completed, .. } => same_day(*last_completed, Some(now)),
        };
        if done {
            TaskStatus::Completed
        } else {
            TaskStatus::Active
        }
    }

    pub fn is_complete(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == TaskStatus::Completed
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        match &self.kind {
            TaskKind::OneTime { due_date, .. } => *due_date,
            TaskKind::Daily { .. } => None,
        }
    }

    pub fn streak(&self) -> u32 {
        match &self.kind {
            TaskKind::Daily { streak, .. } => *streak,
            TaskKind::OneTime { .. } => 0,
        }
    }

    pub fn last_completed(&self) -> Option<DateTime<Utc>> {
        match &self.kind {
            TaskKind::Daily { last_completed, .. } => *last_completed,
            TaskKind::OneTime { .. } => None,
        }
    }

    /// Merges a partial write. Fields that do not apply to this variant are ignored.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        match &mut self.kind {
            TaskKind::OneTime { completed, due_date } => {
                if let Some(c) = patch.completed {
                    *completed = c;
                }
                if let Some(d) = patch.due_date {
                    *due_date = d;
                }
            }
            TaskKind::Daily { streak, last_completed, completion_history } => {
                if let Some(s) = patch.streak {
                    *streak = s;
                }
                if let Some(ts) = patch.last_completed {
                    *last_completed = Some(ts);
                }
                if let Some(d) = patch.add_history_date {
                    completion_history.insert(d);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NewTaskKind {
    OneTime { due_date: Option<NaiveDate> },
    Daily,
}

/// Creation draft; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub text: String,
    pub kind: NewTaskKind,
}

impl NewTask {
    pub fn one_time(text: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        Self { text: text.into(), kind: NewTaskKind::OneTime { due_date } }
    }

    pub fn daily(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: NewTaskKind::Daily }
    }

    pub fn into_task(self, user_id: &str, created_at: DateTime<Utc>) -> Task {
        let kind = match self.kind {
            NewTaskKind::OneTime { due_date } => TaskKind::OneTime { completed: false, due_date },
            NewTaskKind::Daily => TaskKind::Daily {
                streak: 0,
                last_completed: None,
                completion_history: BTreeSet::new(),
            },
        };
        Task {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            text: self.text,
            created_at,
            kind,
        }
    }
}

/// Partial-merge write. `add_history_date` is an idempotent set insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
    pub streak: Option<u32>,
    pub last_completed: Option<DateTime<Utc>>,
    pub add_history_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_for_daily_tracks_today_only() {
        let now = Utc::now();
        let mut task = NewTask::daily("Stretch").into_task("u1", now);
        assert_eq!(task.status(now), TaskStatus::Active);

        task.apply(&TaskPatch { last_completed: Some(now), ..Default::default() });
        assert_eq!(task.status(now), TaskStatus::Completed);
        assert_eq!(task.status(now + Duration::days(2)), TaskStatus::Active);
    }

    #[test]
    fn test_patch_ignores_foreign_fields() {
        let now = Utc::now();
        let mut task = NewTask::one_time("Buy milk", None).into_task("u1", now);
        task.apply(&TaskPatch { streak: Some(4), completed: Some(true), ..Default::default() });
        assert_eq!(task.streak(), 0);
        assert!(task.is_complete(now));
    }

    #[test]
    fn test_history_insert_is_idempotent() {
        let now = Utc::now();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut task = NewTask::daily("Read").into_task("u1", now);
        let patch = TaskPatch { add_history_date: Some(day), ..Default::default() };
        task.apply(&patch);
        task.apply(&patch);
        match &task.kind {
            TaskKind::Daily { completion_history, .. } => assert_eq!(completion_history.len(), 1),
            _ => panic!("expected daily"),
        }
    }

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let json = r#"{
            "id": "6f1c1b3e-6a52-4b8b-9a1e-1b2c3d4e5f60",
            "userId": "u1",
            "text": "Walk",
            "createdAt": "2024-03-01T08:00:00Z",
            "type": "daily"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.streak(), 0);
        assert_eq!(task.last_completed(), None);

        let json = r#"{
            "id": "6f1c1b3e-6a52-4b8b-9a1e-1b2c3d4e5f61",
            "userId": "u1",
            "text": "Taxes",
            "createdAt": "2024-03-01T08:00:00Z",
            "type": "one-time",
            "dueDate": "2024-04-15"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.due_date(), NaiveDate::from_ymd_opt(2024, 4, 15));
        assert!(!task.is_complete(Utc::now()));
    }
}
