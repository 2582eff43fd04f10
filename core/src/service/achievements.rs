use std::collections::BTreeSet;

use crate::model::achievement::{Achievement, TaskStats, ACHIEVEMENTS};
use crate::model::task::{Task, TaskKind};

/// Aggregates over every task a user owns.
///
/// A habit counts towards `total_completed` once it has ever been completed,
/// not once per day.
pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let total_completed = tasks
        .iter()
        .filter(|t| match &t.kind {
            TaskKind::OneTime { completed, .. } => *completed,
            TaskKind::Daily { last_completed, .. } => last_completed.is_some(),
        })
        .count();
    let longest_streak = tasks.iter().map(Task::streak).max().unwrap_or(0);

    TaskStats { total_completed, longest_streak }
}

/// Ids from the catalog whose condition holds and that are not yet unlocked.
pub fn newly_unlocked(stats: &TaskStats, already_unlocked: &BTreeSet<String>) -> Vec<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| !already_unlocked.contains(a.id) && a.is_met(stats))
        .collect()
}

pub fn evaluate_achievements(tasks: &[Task], already_unlocked: &BTreeSet<String>) -> BTreeSet<&'static str> {
    newly_unlocked(&task_stats(tasks), already_unlocked)
        .into_iter()
        .map(|a| a.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{NewTask, TaskPatch};
    use chrono::Utc;
    use rstest::rstest;

    fn ids(list: &[&str]) -> BTreeSet<&'static str> {
        ACHIEVEMENTS.iter().map(|a| a.id).filter(|id| list.contains(id)).collect()
    }

    #[rstest]
    #[case(1, 0, &["first_step"])]
    #[case(5, 0, &["first_step", "task_novice"])]
    #[case(0, 7, &["on_a_roll", "week_warrior"])]
    #[case(0, 3, &["on_a_roll"])]
    #[case(0, 0, &[])]
    fn test_unlocks_for_stats(#[case] total: usize, #[case] streak: u32, #[case] expected: &[&str]) {
        let stats = TaskStats { total_completed: total, longest_streak: streak };
        let got: BTreeSet<&str> = newly_unlocked(&stats, &BTreeSet::new()).iter().map(|a| a.id).collect();
        assert_eq!(got, ids(expected));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let now = Utc::now();
        let mut done = NewTask::one_time("Buy milk", None).into_task("u1", now);
        done.apply(&TaskPatch { completed: Some(true), ..Default::default() });
        let tasks = vec![done];

        let mut unlocked = BTreeSet::new();
        let first = evaluate_achievements(&tasks, &unlocked);
        assert_eq!(first, ids(&["first_step"]));

        unlocked.extend(first.iter().map(|s| s.to_string()));
        assert!(evaluate_achievements(&tasks, &unlocked).is_empty());
    }

    #[test]
    fn test_stats_count_habits_completed_once() {
        let now = Utc::now();
        let mut habit = NewTask::daily("Run").into_task("u1", now);
        habit.apply(&TaskPatch { streak: Some(4), last_completed: Some(now), ..Default::default() });
        let fresh = NewTask::daily("Read").into_task("u1", now);
        let open = NewTask::one_time("Call mom", None).into_task("u1", now);

        let stats = task_stats(&[habit, fresh, open]);
        assert_eq!(stats, TaskStats { total_completed: 1, longest_streak: 4 });
        assert_eq!(task_stats(&[]), TaskStats::default());
    }
}
