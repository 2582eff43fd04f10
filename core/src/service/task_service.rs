use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::model::achievement::Achievement;
use crate::model::profile::{ProfilePatch, ScoreWrite, UserProfile};
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::repository::{ProfileRepository, TaskRepository};
use crate::service::achievements::{newly_unlocked, task_stats};
use crate::service::completion::{evaluate_completion, Completion};

/// What a single check-off did.
#[derive(Debug, Clone)]
pub struct CompletionReport {
    pub task: Task,
    pub completion: Completion,
    /// Points actually written to the profile.
    pub awarded: i64,
    pub unlocked: Vec<&'static Achievement>,
}

pub struct TaskService<R: TaskRepository, P: ProfileRepository> {
    repo: R,
    profiles: P,
}

impl<R: TaskRepository, P: ProfileRepository> TaskService<R, P> {
    pub fn new(repo: R, profiles: P) -> Self {
        Self { repo, profiles }
    }

    pub fn create_task(&self, user_id: &str, mut draft: NewTask) -> Result<Task> {
        draft.text = validate_text(&draft.text)?;
        let task = self.repo.create(user_id, draft)?;
        info!(task_id = %task.id, user_id, daily = task.is_daily(), "task added");
        Ok(task)
    }

    pub fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        self.repo.list(user_id)
    }

    /// Resolves a unique id prefix among the user's tasks.
    pub fn find_by_prefix(&self, user_id: &str, prefix: &str) -> Result<Task> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Err(anyhow!("Task ID is required"));
        }
        let mut matches: Vec<Task> = self
            .repo
            .list(user_id)?
            .into_iter()
            .filter(|t| t.id.to_string().starts_with(&prefix))
            .collect();

        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(anyhow!("No task matches '{}'", prefix)),
            n => Err(anyhow!("Ambiguous task ID '{}' matches {} tasks", prefix, n)),
        }
    }

    /// Edits text and, for one-time tasks, the due date.
    pub fn edit_task(&self, id: &Uuid, text: Option<&str>, due_date: Option<Option<NaiveDate>>) -> Result<()> {
        let task = self.repo.get(id)?;
        let text = text.map(validate_text).transpose()?;
        if due_date.is_some() && task.is_daily() {
            warn!(task_id = %id, "daily habits have no due date; ignoring");
        }
        let patch = TaskPatch {
            text,
            due_date: if task.is_daily() { None } else { due_date },
            ..Default::default()
        };
        self.repo.update(id, &patch)
    }

    pub fn delete_task(&self, id: &Uuid) -> Result<()> {
        self.repo.delete(id)?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Checks a task off (or back on, for one-time tasks).
    ///
    /// The task write goes first; the score increment and the achievement
    /// check only run once it has returned. Failures after the task write are
    /// logged and leave the report with whatever did succeed.
    pub fn toggle_completion(&self, user_id: &str, id: &Uuid, now: DateTime<Utc>) -> Result<CompletionReport> {
        let mut task = self.repo.get(id)?;
        let completion = evaluate_completion(&task, now);

        let Some(patch) = completion.to_patch(now) else {
            info!(task_id = %id, "habit already completed today");
            return Ok(CompletionReport { task, completion, awarded: 0, unlocked: Vec::new() });
        };
        self.repo.update(id, &patch)?;
        task.apply(&patch);

        let mut awarded = 0;
        let points = completion.score_award();
        if points > 0 {
            match self.award(user_id, points, now) {
                Ok(profile) => {
                    awarded = points;
                    info!(user_id, points, score = profile.zenith_score, "score awarded");
                }
                Err(e) => warn!(user_id, error = %e, "failed to award score"),
            }
        }

        let unlocked = if completion.counts_as_completion() {
            self.check_achievements(user_id).unwrap_or_else(|e| {
                warn!(user_id, error = %e, "achievement check failed");
                Vec::new()
            })
        } else {
            Vec::new()
        };

        Ok(CompletionReport { task, completion, awarded, unlocked })
    }

    /// Adds `points` to today's score. A missing profile or a score last
    /// touched on an earlier local day starts over from `points`.
    fn award(&self, user_id: &str, points: i64, now: DateTime<Utc>) -> Result<UserProfile> {
        let stale = match self.profiles.get(user_id)? {
            Some(mut profile) => profile.refresh_daily_score(now),
            None => true,
        };
        let patch = if stale {
            ProfilePatch {
                score: Some(ScoreWrite::Set(points)),
                score_last_updated: Some(now),
                ..Default::default()
            }
        } else {
            ProfilePatch::increment(points)
        };
        self.profiles.upsert(user_id, &patch)
    }

    /// Unlocks every catalog entry whose condition now holds. Idempotent.
    pub fn check_achievements(&self, user_id: &str) -> Result<Vec<&'static Achievement>> {
        let profile = self.profiles.get(user_id)?.unwrap_or_else(|| UserProfile::new(user_id));
        let tasks = self.repo.list(user_id)?;
        let unlocked = newly_unlocked(&task_stats(&tasks), &profile.unlocked_achievements);

        if !unlocked.is_empty() {
            let ids: Vec<String> = unlocked.iter().map(|a| a.id.to_string()).collect();
            self.profiles.upsert(user_id, &ProfilePatch::unlock(ids.clone()))?;
            info!(user_id, achievements = ?ids, "achievements unlocked");
        }
        Ok(unlocked)
    }
}

fn validate_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Task text is required"));
    }
    Ok(trimmed.to_string())
}
