use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::repository::json_file::{ensure_file, read_json, write_json};
use crate::repository::traits::TaskRepository;
use crate::repository::watch::{Callback, Subscription, Watchers};

const DEFAULT_FILE_NAME: &str = "tasks.json";

#[derive(Clone)]
pub struct FileTaskRepository {
    file_path: PathBuf,
    watchers: Watchers<[Task]>,
}

impl FileTaskRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match base_dir {
            Some(dir) => dir,
            None => Config::default_data_dir()?,
        };
        let file_path = ensure_file(&dir, DEFAULT_FILE_NAME, &Vec::<Task>::new())?;

        Ok(FileTaskRepository {
            file_path,
            watchers: Watchers::new(),
        })
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        read_json(&self.file_path)
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        write_json(&self.file_path, tasks)
    }

    fn publish(&self, user_id: &str, tasks: &[Task]) {
        if !self.watchers.has_listeners(user_id) {
            return;
        }
        let owned: Vec<Task> = tasks.iter().filter(|t| t.user_id == user_id).cloned().collect();
        self.watchers.notify(user_id, &owned);
    }
}

impl TaskRepository for FileTaskRepository {
    fn create(&self, user_id: &str, draft: NewTask) -> Result<Task> {
        let mut tasks = self.read_tasks()?;
        let task = draft.into_task(user_id, Utc::now());
        tasks.push(task.clone());
        self.write_tasks(&tasks)?;
        debug!(task_id = %task.id, user_id, "task created");
        self.publish(user_id, &tasks);
        Ok(task)
    }

    fn get(&self, id: &Uuid) -> Result<Task> {
        self.read_tasks()?
            .into_iter()
            .find(|t| t.id == *id)
            .ok_or_else(|| anyhow!("Task with ID {} not found", id))
    }

    fn list(&self, user_id: &str) -> Result<Vec<Task>> {
        Ok(self.read_tasks()?.into_iter().filter(|t| t.user_id == user_id).collect())
    }

    fn update(&self, id: &Uuid, patch: &TaskPatch) -> Result<()> {
        let mut tasks = self.read_tasks()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or_else(|| anyhow!("Task with ID {} not found", id))?;
        task.apply(patch);
        let user_id = task.user_id.clone();
        self.write_tasks(&tasks)?;
        self.publish(&user_id, &tasks);
        Ok(())
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let mut tasks = self.read_tasks()?;
        let user_id = tasks
            .iter()
            .find(|t| t.id == *id)
            .map(|t| t.user_id.clone())
            .ok_or_else(|| anyhow!("Task with ID {} not found", id))?;
        tasks.retain(|t| t.id != *id);
        self.write_tasks(&tasks)?;
        self.publish(&user_id, &tasks);
        Ok(())
    }

    fn subscribe(&self, user_id: &str, callback: Callback<[Task]>) -> Result<Subscription> {
        let current = self.list(user_id)?;
        callback(&current);
        Ok(self.watchers.subscribe(user_id, callback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("zenith-test-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_crud_round() {
        let dir = temp_dir();
        let repo = FileTaskRepository::new(Some(dir.clone())).unwrap();

        let task = repo.create("alice", NewTask::one_time("Buy milk", None)).unwrap();
        repo.create("bob", NewTask::daily("Run")).unwrap();
        assert_eq!(repo.list("alice").unwrap().len(), 1);

        repo.update(&task.id, &TaskPatch { completed: Some(true), ..Default::default() }).unwrap();
        assert!(repo.get(&task.id).unwrap().is_complete(Utc::now()));

        repo.delete(&task.id).unwrap();
        assert!(repo.get(&task.id).is_err());
        assert!(repo.delete(&task.id).is_err());
        assert_eq!(repo.list("bob").unwrap().len(), 1);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_subscribe_pushes_full_set() {
        let dir = temp_dir();
        let repo = FileTaskRepository::new(Some(dir.clone())).unwrap();
        let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let sub = repo
            .subscribe("alice", Arc::new(move |tasks: &[Task]| sink.lock().unwrap().push(tasks.len())))
            .unwrap();

        repo.create("alice", NewTask::daily("Stretch")).unwrap();
        repo.create("bob", NewTask::daily("Other")).unwrap();
        repo.create("alice", NewTask::daily("Read")).unwrap();
        sub.unsubscribe();
        repo.create("alice", NewTask::daily("Ignored")).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
        let _ = std::fs::remove_dir_all(dir);
    }
}
