use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::repository::json_file::{ensure_file, read_json, write_json};
use crate::repository::traits::AuthProvider;
use crate::repository::watch::{Callback, Subscription, Watchers};

const SESSION_FILE_NAME: &str = "session.json";
// auth listeners are not per-user
const AUTH_KEY: &str = "auth";

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct Session {
    user_id: Option<String>,
}

/// Local sign-in state persisted next to the data files.
#[derive(Clone)]
pub struct FileSessionProvider {
    file_path: PathBuf,
    watchers: Watchers<Option<String>>,
}

impl FileSessionProvider {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match base_dir {
            Some(dir) => dir,
            None => Config::default_data_dir()?,
        };
        let file_path = ensure_file(&dir, SESSION_FILE_NAME, &Session::default())?;
        Ok(FileSessionProvider {
            file_path,
            watchers: Watchers::new(),
        })
    }

    fn store(&self, user_id: Option<String>) -> Result<()> {
        write_json(&self.file_path, &Session { user_id: user_id.clone() })?;
        self.watchers.notify(AUTH_KEY, &user_id);
        Ok(())
    }
}

impl AuthProvider for FileSessionProvider {
    fn current_user(&self) -> Result<Option<String>> {
        let session: Session = read_json(&self.file_path)?;
        Ok(session.user_id)
    }

    fn sign_in(&self, user_id: &str) -> Result<()> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(anyhow!("User name is required"));
        }
        info!(user_id, "signed in");
        self.store(Some(user_id.to_string()))
    }

    fn sign_out(&self) -> Result<()> {
        info!("signed out");
        self.store(None)
    }

    fn on_auth_state_change(&self, callback: Callback<Option<String>>) -> Subscription {
        self.watchers.subscribe(AUTH_KEY, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    #[test]
    fn test_sign_in_out_notifies() {
        let dir = std::env::temp_dir().join(format!("zenith-test-{}", Uuid::new_v4()));
        let auth = FileSessionProvider::new(Some(dir.clone())).unwrap();
        let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let _sub = auth.on_auth_state_change(Arc::new(move |user: &Option<String>| {
            sink.lock().unwrap().push(user.clone());
        }));

        assert_eq!(auth.current_user().unwrap(), None);
        auth.sign_in("alice").unwrap();
        assert_eq!(auth.current_user().unwrap(), Some("alice".to_string()));
        auth.sign_out().unwrap();
        assert_eq!(auth.current_user().unwrap(), None);
        assert!(auth.sign_in("  ").is_err());

        assert_eq!(*seen.lock().unwrap(), vec![Some("alice".to_string()), None]);
        let _ = std::fs::remove_dir_all(dir);
    }
}
