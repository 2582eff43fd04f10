use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::task::{Task, TaskKind};

/// All-day calendar entry for a dated one-time task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub task_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub completed: bool,
}

pub fn due_events(tasks: &[Task]) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = tasks
        .iter()
        .filter_map(|task| match &task.kind {
            TaskKind::OneTime { completed, due_date: Some(date) } => Some(CalendarEvent {
                task_id: task.id,
                title: task.text.clone(),
                date: *date,
                completed: *completed,
            }),
            _ => None,
        })
        .collect();
    events.sort_by_key(|e| e.date);
    events
}

/// Keeps the events falling in the same calendar month as `month`.
pub fn events_in_month(events: Vec<CalendarEvent>, month: NaiveDate) -> Vec<CalendarEvent> {
    events
        .into_iter()
        .filter(|e| e.date.year() == month.year() && e.date.month() == month.month())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::NewTask;
    use chrono::Utc;

    #[test]
    fn test_due_events() {
        let now = Utc::now();
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day);
        let tasks = vec![
            NewTask::one_time("Rent", d(4, 1)).into_task("u1", now),
            NewTask::one_time("No date", None).into_task("u1", now),
            NewTask::daily("Habit").into_task("u1", now),
            NewTask::one_time("Taxes", d(3, 15)).into_task("u1", now),
        ];
        let events = due_events(&tasks);
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Taxes", "Rent"]);

        let april = events_in_month(events, NaiveDate::from_ymd_opt(2024, 4, 20).unwrap());
        assert_eq!(april.len(), 1);
        assert_eq!(april[0].title, "Rent");
        assert!(events_in_month(april, NaiveDate::from_ymd_opt(2023, 4, 1).unwrap()).is_empty());
    }
}
