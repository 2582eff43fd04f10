use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::model::achievement::{Achievement, TaskStats, ACHIEVEMENTS};
use crate::repository::{ProfileRepository, TaskRepository};
use crate::service::achievements::task_stats;
use crate::time::local_date;
use crate::usecase::report::{last_seven_days, Bucket};

#[derive(Debug, Clone)]
pub struct AchievementStatus {
    pub achievement: &'static Achievement,
    pub unlocked: bool,
}

#[derive(Debug, Clone)]
pub struct Progress {
    pub stats: TaskStats,
    pub last_seven_days: Vec<Bucket>,
    pub achievements: Vec<AchievementStatus>,
}

impl Progress {
    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }
}

pub struct ProgressUseCase<'a, R: TaskRepository, P: ProfileRepository> {
    task_repo: &'a R,
    profiles: &'a P,
}

impl<'a, R: TaskRepository, P: ProfileRepository> ProgressUseCase<'a, R, P> {
    pub fn new(task_repo: &'a R, profiles: &'a P) -> Self {
        Self { task_repo, profiles }
    }

    pub fn get_progress(&self, user_id: &str, now: DateTime<Utc>) -> Result<Progress> {
        let tasks = self.task_repo.list(user_id)?;
        let unlocked_ids = self
            .profiles
            .get(user_id)?
            .map(|p| p.unlocked_achievements)
            .unwrap_or_default();

        let achievements = ACHIEVEMENTS
            .iter()
            .map(|achievement| AchievementStatus {
                achievement,
                unlocked: unlocked_ids.contains(achievement.id),
            })
            .collect();

        Ok(Progress {
            stats: task_stats(&tasks),
            last_seven_days: last_seven_days(&tasks, local_date(now)),
            achievements,
        })
    }
}
