use std::str::FromStr;

use anyhow::{anyhow, Error, Result};
use chrono::{Datelike, Days, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::task::Task;
use crate::time::{days_in_month, local_date, start_of_week};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Week,
    Month,
    Year,
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "w" | "week" | "weekly" => Ok(Granularity::Week),
            "m" | "month" | "monthly" => Ok(Granularity::Month),
            "y" | "year" | "yearly" => Ok(Granularity::Year),
            _ => Err(anyhow!("Unknown view: {}", s)),
        }
    }
}

/// One bar of a completions chart. `start..=end` is the covered date range.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Bucket {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub count: usize,
}

/// Counts tasks by the local date of their most recent completion.
///
/// Only `last_completed` is consulted, so a habit completed on several days
/// in the window shows up once, on its latest day.
pub fn bucket(tasks: &[Task], granularity: Granularity, reference: NaiveDate) -> Vec<Bucket> {
    let completed: Vec<NaiveDate> = tasks
        .iter()
        .filter_map(Task::last_completed)
        .map(local_date)
        .collect();

    bucket_ranges(granularity, reference)
        .into_iter()
        .map(|(label, start, end)| Bucket {
            count: completed.iter().filter(|d| **d >= start && **d <= end).count(),
            label,
            start,
            end,
        })
        .collect()
}

/// Seven daily buckets ending with `today`, oldest first.
pub fn last_seven_days(tasks: &[Task], today: NaiveDate) -> Vec<Bucket> {
    let start = today.checked_sub_days(Days::new(6)).unwrap_or(NaiveDate::MIN);
    let mut buckets = bucket_days(tasks, start, 7);
    for b in &mut buckets {
        b.label = b.start.format("%a").to_string();
    }
    buckets
}

fn bucket_days(tasks: &[Task], start: NaiveDate, days: u64) -> Vec<Bucket> {
    let completed: Vec<NaiveDate> = tasks.iter().filter_map(Task::last_completed).map(local_date).collect();
    (0..days)
        .filter_map(|i| start.checked_add_days(Days::new(i)))
        .map(|day| Bucket {
            label: day.day().to_string(),
            start: day,
            end: day,
            count: completed.iter().filter(|d| **d == day).count(),
        })
        .collect()
}

/// Every calendar day covered by a week or month window.
pub fn window_dates(granularity: Granularity, reference: NaiveDate) -> Vec<NaiveDate> {
    match granularity {
        Granularity::Week => {
            let start = start_of_week(reference);
            (0..7).filter_map(|i| start.checked_add_days(Days::new(i))).collect()
        }
        Granularity::Month => (1..=days_in_month(reference.year(), reference.month()))
            .filter_map(|d| NaiveDate::from_ymd_opt(reference.year(), reference.month(), d))
            .collect(),
        Granularity::Year => (1..=12)
            .filter_map(|m| NaiveDate::from_ymd_opt(reference.year(), m, 1))
            .collect(),
    }
}

fn bucket_ranges(granularity: Granularity, reference: NaiveDate) -> Vec<(String, NaiveDate, NaiveDate)> {
    match granularity {
        Granularity::Week => window_dates(granularity, reference)
            .into_iter()
            .map(|d| (format!("{} {}", d.format("%a"), d.day()), d, d))
            .collect(),
        Granularity::Month => window_dates(granularity, reference)
            .into_iter()
            .map(|d| (d.day().to_string(), d, d))
            .collect(),
        Granularity::Year => window_dates(granularity, reference)
            .into_iter()
            .map(|first| {
                let last = first.with_day(days_in_month(first.year(), first.month())).unwrap_or(first);
                (first.format("%b").to_string(), first, last)
            })
            .collect(),
    }
}

/// Human label for the window containing `reference`.
pub fn window_label(granularity: Granularity, reference: NaiveDate) -> String {
    match granularity {
        Granularity::Week => format!("Week of {}", start_of_week(reference).format("%Y-%m-%d")),
        Granularity::Month => reference.format("%B %Y").to_string(),
        Granularity::Year => reference.format("%Y").to_string(),
    }
}

/// Moves the reference date by `steps` windows (negative goes back).
pub fn shift(granularity: Granularity, reference: NaiveDate, steps: i32) -> Result<NaiveDate> {
    let out_of_range = || anyhow!("Date out of range");
    match granularity {
        Granularity::Week => reference
            .checked_add_signed(Duration::weeks(steps as i64))
            .ok_or_else(out_of_range),
        Granularity::Month | Granularity::Year => {
            let months = steps.unsigned_abs() * if granularity == Granularity::Year { 12 } else { 1 };
            let shifted = if steps >= 0 {
                reference.checked_add_months(Months::new(months))
            } else {
                reference.checked_sub_months(Months::new(months))
            };
            shifted.ok_or_else(out_of_range)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{NewTask, TaskPatch};
    use chrono::{DateTime, Local, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap().with_timezone(&Utc)
    }

    fn habit_done(on: DateTime<Utc>) -> Task {
        let mut task = NewTask::daily("habit").into_task("u1", on);
        task.apply(&TaskPatch { last_completed: Some(on), streak: Some(1), ..Default::default() });
        task
    }

    #[test]
    fn test_week_buckets_start_on_sunday() {
        // 2024-03-13 is a Wednesday; its week starts Sunday 2024-03-10
        let tasks = vec![habit_done(at(2024, 3, 10)), habit_done(at(2024, 3, 13)), habit_done(at(2024, 3, 13))];
        let buckets = bucket(&tasks, Granularity::Week, date(2024, 3, 13));
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].label, "Sun 10");
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[3].label, "Wed 13");
        assert_eq!(buckets[3].count, 2);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_month_and_year_buckets() {
        let tasks = vec![habit_done(at(2024, 2, 29)), habit_done(at(2024, 7, 4))];
        let month = bucket(&tasks, Granularity::Month, date(2024, 2, 1));
        assert_eq!(month.len(), 29);
        assert_eq!(month[28].label, "29");
        assert_eq!(month[28].count, 1);

        let year = bucket(&tasks, Granularity::Year, date(2024, 5, 5));
        assert_eq!(year.len(), 12);
        assert_eq!(year[0].label, "Jan");
        assert_eq!(year[1].count, 1);
        assert_eq!(year[6].count, 1);
        assert_eq!(year[6].end, date(2024, 7, 31));
    }

    #[test]
    fn test_never_completed_tasks_are_ignored() {
        let tasks = vec![NewTask::daily("fresh").into_task("u1", at(2024, 3, 10))];
        let buckets = bucket(&tasks, Granularity::Week, date(2024, 3, 10));
        assert!(buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_last_seven_days() {
        let tasks = vec![habit_done(at(2024, 3, 7)), habit_done(at(2024, 3, 13)), habit_done(at(2024, 3, 6))];
        let buckets = last_seven_days(&tasks, date(2024, 3, 13));
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].start, date(2024, 3, 7));
        assert_eq!(buckets[0].label, "Thu");
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[6].count, 1);
    }

    #[test]
    fn test_shift_and_label() {
        assert_eq!(shift(Granularity::Week, date(2024, 3, 13), -1).unwrap(), date(2024, 3, 6));
        assert_eq!(shift(Granularity::Month, date(2024, 1, 31), 1).unwrap(), date(2024, 2, 29));
        assert_eq!(shift(Granularity::Year, date(2024, 3, 13), -2).unwrap(), date(2022, 3, 13));
        assert_eq!(window_label(Granularity::Week, date(2024, 3, 13)), "Week of 2024-03-10");
        assert_eq!(window_label(Granularity::Month, date(2024, 3, 13)), "March 2024");
        assert_eq!("monthly".parse::<Granularity>().unwrap(), Granularity::Month);
    }

    #[test]
    fn test_windows_at_the_edges_of_the_calendar() {
        for granularity in [Granularity::Week, Granularity::Month, Granularity::Year] {
            let late = bucket(&[], granularity, NaiveDate::MAX);
            assert!(late.iter().all(|b| b.start <= b.end && b.end <= NaiveDate::MAX));
            let early = bucket(&[], granularity, NaiveDate::MIN);
            assert!(early.iter().all(|b| b.start >= NaiveDate::MIN));
        }
        assert_eq!(bucket(&[], Granularity::Year, NaiveDate::MAX)[11].end, NaiveDate::MAX);
        assert_eq!(window_dates(Granularity::Month, NaiveDate::MAX).len(), 31);
        assert_eq!(last_seven_days(&[], NaiveDate::MIN)[0].start, NaiveDate::MIN);
        assert!(shift(Granularity::Week, NaiveDate::MAX, 1).is_err());
    }
}
