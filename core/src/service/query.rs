use std::cmp::Ordering;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::task::{Task, TaskStatus};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl FromStr for TaskFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "active" | "open" => Ok(TaskFilter::Active),
            "completed" | "done" => Ok(TaskFilter::Completed),
            _ => Err(anyhow!("Unknown filter: {}", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortStrategy {
    #[default]
    #[serde(rename = "createdAt_desc")]
    Newest,
    #[serde(rename = "createdAt_asc")]
    Oldest,
    #[serde(rename = "dueDate_asc")]
    DueDate,
}

impl FromStr for SortStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt_desc" | "newest" => Ok(SortStrategy::Newest),
            "createdAt_asc" | "oldest" => Ok(SortStrategy::Oldest),
            "dueDate_asc" | "due" => Ok(SortStrategy::DueDate),
            _ => Err(anyhow!("Unknown sort: {}", s)),
        }
    }
}

/// Daily habits and one-time tasks, each filtered and sorted on its own.
#[derive(Debug, Clone, Default)]
pub struct TaskGroups {
    pub daily: Vec<Task>,
    pub one_time: Vec<Task>,
}

/// Search, filter and sort into a single list.
pub fn select(
    tasks: &[Task],
    filter: TaskFilter,
    strategy: SortStrategy,
    search: &str,
    now: DateTime<Utc>,
) -> Vec<Task> {
    let needle = search.to_lowercase();
    let mut selected: Vec<Task> = tasks
        .iter()
        .filter(|t| t.text.to_lowercase().contains(&needle))
        .filter(|t| matches_filter(t, filter, now))
        .cloned()
        .collect();
    sort_tasks(&mut selected, strategy);
    selected
}

pub fn select_grouped(
    tasks: &[Task],
    filter: TaskFilter,
    strategy: SortStrategy,
    search: &str,
    now: DateTime<Utc>,
) -> TaskGroups {
    let (daily, one_time) = select(tasks, filter, strategy, search, now)
        .into_iter()
        .partition(Task::is_daily);
    TaskGroups { daily, one_time }
}

fn matches_filter(task: &Task, filter: TaskFilter, now: DateTime<Utc>) -> bool {
    match filter {
        TaskFilter::All => true,
        TaskFilter::Active => task.status(now) == TaskStatus::Active,
        TaskFilter::Completed => task.status(now) == TaskStatus::Completed,
    }
}

/// Stable sort. Under `DueDate`, undated tasks go last in their original order.
pub fn sort_tasks(tasks: &mut [Task], strategy: SortStrategy) {
    tasks.sort_by(|a, b| compare(a, b, strategy));
}

fn compare(a: &Task, b: &Task, strategy: SortStrategy) -> Ordering {
    match strategy {
        SortStrategy::Newest => b.created_at.cmp(&a.created_at),
        SortStrategy::Oldest => a.created_at.cmp(&b.created_at),
        SortStrategy::DueDate => match (a.due_date(), b.due_date()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}
