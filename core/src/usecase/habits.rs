use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::model::task::{Task, TaskKind};
use crate::usecase::report::{window_dates, window_label, Granularity};

#[derive(Debug, Clone, PartialEq)]
pub struct HabitRow {
    pub task_id: Uuid,
    pub text: String,
    pub streak: u32,
    /// One flag per entry of `HabitGrid::dates`.
    pub done: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HabitGrid {
    pub label: String,
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<HabitRow>,
}

/// Per-day completion grid for daily habits, read from completion history.
pub fn habit_grid(tasks: &[Task], granularity: Granularity, reference: NaiveDate) -> Result<HabitGrid> {
    if granularity == Granularity::Year {
        return Err(anyhow!("Habit tracker supports week or month views"));
    }
    let dates = window_dates(granularity, reference);

    let rows = tasks
        .iter()
        .filter_map(|task| match &task.kind {
            TaskKind::Daily { streak, completion_history, .. } => Some(HabitRow {
                task_id: task.id,
                text: task.text.clone(),
                streak: *streak,
                done: dates.iter().map(|d| completion_history.contains(d)).collect(),
            }),
            TaskKind::OneTime { .. } => None,
        })
        .collect();

    Ok(HabitGrid {
        label: window_label(granularity, reference),
        dates,
        rows,
    })
}
