use anyhow::Result;
use uuid::Uuid;

use crate::model::profile::{ProfilePatch, UserProfile};
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::repository::watch::{Callback, Subscription};

/// Document store for tasks.
pub trait TaskRepository {
    /// Persists a draft; the store assigns `id` and `created_at`.
    fn create(&self, user_id: &str, draft: NewTask) -> Result<Task>;
    fn get(&self, id: &Uuid) -> Result<Task>;
    fn list(&self, user_id: &str) -> Result<Vec<Task>>;
    /// Partial merge; see [`TaskPatch`].
    fn update(&self, id: &Uuid, patch: &TaskPatch) -> Result<()>;
    fn delete(&self, id: &Uuid) -> Result<()>;
    /// Pushes the user's full task set on every change.
    fn subscribe(&self, user_id: &str, callback: Callback<[Task]>) -> Result<Subscription>;
}

pub trait ProfileRepository {
    fn get(&self, user_id: &str) -> Result<Option<UserProfile>>;
    /// Merges `patch`, creating a default profile first when none exists.
    fn upsert(&self, user_id: &str, patch: &ProfilePatch) -> Result<UserProfile>;
}

/// Identity collaborator. Users are identified by an opaque id string.
pub trait AuthProvider {
    fn current_user(&self) -> Result<Option<String>>;
    fn sign_in(&self, user_id: &str) -> Result<()>;
    fn sign_out(&self) -> Result<()>;
    /// Called with the new identity (or `None`) after every sign-in/out.
    fn on_auth_state_change(&self, callback: Callback<Option<String>>) -> Subscription;
}
