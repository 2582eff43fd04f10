use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::model::profile::{ProfilePatch, UserProfile};
use crate::repository::json_file::{ensure_file, read_json, write_json};
use crate::repository::traits::ProfileRepository;

const PROFILE_FILE_NAME: &str = "profiles.json";

#[derive(Clone)]
pub struct FileProfileRepository {
    file_path: PathBuf,
}

impl FileProfileRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match base_dir {
            Some(dir) => dir,
            None => Config::default_data_dir()?,
        };
        let file_path = ensure_file(&dir, PROFILE_FILE_NAME, &Vec::<UserProfile>::new())?;
        Ok(FileProfileRepository { file_path })
    }

    fn read_profiles(&self) -> Result<Vec<UserProfile>> {
        read_json(&self.file_path)
    }
}

impl ProfileRepository for FileProfileRepository {
    fn get(&self, user_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.read_profiles()?.into_iter().find(|p| p.user_id == user_id))
    }

    fn upsert(&self, user_id: &str, patch: &ProfilePatch) -> Result<UserProfile> {
        let mut profiles = self.read_profiles()?;
        let pos = match profiles.iter().position(|p| p.user_id == user_id) {
            Some(pos) => pos,
            None => {
                profiles.push(UserProfile::new(user_id));
                profiles.len() - 1
            }
        };
        profiles[pos].apply(patch);
        let updated = profiles[pos].clone();
        write_json(&self.file_path, &profiles)?;
        Ok(updated)
    }
}
