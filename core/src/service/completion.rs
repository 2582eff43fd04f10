use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::model::task::{Task, TaskKind, TaskPatch};
use crate::time::{local_date, same_day};

/// Points for any first-time completion.
pub const COMPLETION_POINTS: i64 = 10;
/// Extra points for a habit whose streak was alive before this completion.
pub const STREAK_BONUS: i64 = 5;

/// Outcome of checking a task off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Habit already completed today; nothing to write.
    AlreadyDoneToday,
    Habit {
        previous_streak: u32,
        new_streak: u32,
        history_date: NaiveDate,
    },
    /// One-time tasks flip their flag; `completed` is the new value.
    Toggle { completed: bool },
}

impl Completion {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Completion::AlreadyDoneToday)
    }

    pub fn new_streak(&self) -> Option<u32> {
        match self {
            Completion::Habit { new_streak, .. } => Some(*new_streak),
            _ => None,
        }
    }

    pub fn history_date(&self) -> Option<NaiveDate> {
        match self {
            Completion::Habit { history_date, .. } => Some(*history_date),
            _ => None,
        }
    }

    /// Score delta for this completion. Un-completing a one-time task awards
    /// nothing and takes nothing back.
    pub fn score_award(&self) -> i64 {
        match self {
            Completion::AlreadyDoneToday => 0,
            Completion::Toggle { completed: true } => COMPLETION_POINTS,
            Completion::Toggle { completed: false } => 0,
            Completion::Habit { previous_streak, .. } => {
                if *previous_streak > 0 {
                    COMPLETION_POINTS + STREAK_BONUS
                } else {
                    COMPLETION_POINTS
                }
            }
        }
    }

    /// Whether this completion should trigger an achievement check.
    pub fn counts_as_completion(&self) -> bool {
        matches!(self, Completion::Habit { .. } | Completion::Toggle { completed: true })
    }

    pub fn to_patch(&self, now: DateTime<Utc>) -> Option<TaskPatch> {
        match self {
            Completion::AlreadyDoneToday => None,
            Completion::Habit { new_streak, history_date, .. } => Some(TaskPatch {
                streak: Some(*new_streak),
                last_completed: Some(now),
                add_history_date: Some(*history_date),
                ..Default::default()
            }),
            Completion::Toggle { completed } => Some(TaskPatch {
                completed: Some(*completed),
                ..Default::default()
            }),
        }
    }
}

/// Decides what checking `task` off at `now` means. Pure; the caller writes.
///
/// A habit extends its streak only when the previous completion was on the
/// local calendar day before `now`. Any other prior completion, including one
/// dated in the future by clock skew, restarts the streak at 1.
pub fn evaluate_completion(task: &Task, now: DateTime<Utc>) -> Completion {
    let completion = match &task.kind {
        TaskKind::OneTime { completed, .. } => Completion::Toggle { completed: !completed },
        TaskKind::Daily { streak, last_completed, .. } => {
            if same_day(*last_completed, Some(now)) {
                Completion::AlreadyDoneToday
            } else {
                let today = local_date(now);
                let yesterday = today.pred_opt();
                let extends = match (last_completed, yesterday) {
                    (Some(last), Some(yesterday)) => local_date(*last) == yesterday,
                    _ => false,
                };
                Completion::Habit {
                    previous_streak: *streak,
                    new_streak: if extends { streak + 1 } else { 1 },
                    history_date: today,
                }
            }
        }
    };
    debug!(task_id = %task.id, ?completion, "evaluated completion");
    completion
}
