
#[cfg(test)]
mod tests {
    use crate::usecase::progress::ProgressUseCase;
    use crate::repository::{Callback, ProfileRepository, Subscription, TaskRepository};
    use crate::model::task::{NewTask, Task, TaskPatch};
    use crate::model::profile::{ProfilePatch, UserProfile};
    use chrono::{Duration, Utc};
    use uuid::Uuid;
    use anyhow::Result;

    struct MockTaskRepo {
        tasks: Vec<Task>,
    }

    impl TaskRepository for MockTaskRepo {
        fn create(&self, _user_id: &str, _draft: NewTask) -> Result<Task> { unimplemented!() }
        fn get(&self, _id: &Uuid) -> Result<Task> { unimplemented!() }
        fn list(&self, _user_id: &str) -> Result<Vec<Task>> { Ok(self.tasks.clone()) }
        fn update(&self, _id: &Uuid, _patch: &TaskPatch) -> Result<()> { unimplemented!() }
        fn delete(&self, _id: &Uuid) -> Result<()> { unimplemented!() }
        fn subscribe(&self, _user_id: &str, _callback: Callback<[Task]>) -> Result<Subscription> {
            Ok(Subscription::detached())
        }
    }

    struct MockProfileRepo {
        profile: Option<UserProfile>,
    }

    impl ProfileRepository for MockProfileRepo {
        fn get(&self, _user_id: &str) -> Result<Option<UserProfile>> { Ok(self.profile.clone()) }
        fn upsert(&self, _user_id: &str, _patch: &ProfilePatch) -> Result<UserProfile> { unimplemented!() }
    }

    #[test]
    fn test_get_progress_counts_and_unlocks() {
        let now = Utc::now();
        let yesterday = now - Duration::days(1);

        let mut habit = NewTask::daily("Run").into_task("u1", now);
        habit.apply(&TaskPatch { streak: Some(4), last_completed: Some(yesterday), ..Default::default() });
        let mut chore = NewTask::one_time("Laundry", None).into_task("u1", now);
        chore.apply(&TaskPatch { completed: Some(true), ..Default::default() });
        let open = NewTask::one_time("Dentist", None).into_task("u1", now);

        let mut profile = UserProfile::new("u1");
        profile.apply(&ProfilePatch::unlock(vec!["first_step".to_string()]));

        let task_repo = MockTaskRepo { tasks: vec![habit, chore, open] };
        let profiles = MockProfileRepo { profile: Some(profile) };
        let progress = ProgressUseCase::new(&task_repo, &profiles).get_progress("u1", now).unwrap();

        // the habit's last completion was yesterday, it still counts toward totals
        assert_eq!(progress.stats.total_completed, 2);
        assert_eq!(progress.stats.longest_streak, 4);
        assert_eq!(progress.achievements.len(), 4);
        assert_eq!(progress.unlocked_count(), 1);
        assert!(progress.achievements[0].unlocked);

        assert_eq!(progress.last_seven_days.len(), 7);
        assert_eq!(progress.last_seven_days[5].count, 1);
        assert_eq!(progress.last_seven_days[6].count, 0);
    }

    #[test]
    fn test_get_progress_without_profile() {
        let task_repo = MockTaskRepo { tasks: vec![] };
        let profiles = MockProfileRepo { profile: None };
        let progress = ProgressUseCase::new(&task_repo, &profiles).get_progress("u1", Utc::now()).unwrap();

        assert_eq!(progress.stats.total_completed, 0);
        assert_eq!(progress.unlocked_count(), 0);
        assert!(progress.last_seven_days.iter().all(|b| b.count == 0));
    }
}
