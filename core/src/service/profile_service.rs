use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::model::profile::{ProfilePatch, UserProfile};
use crate::repository::ProfileRepository;

pub struct ProfileService<P: ProfileRepository> {
    repo: P,
}

impl<P: ProfileRepository> ProfileService<P> {
    pub fn new(repo: P) -> Self {
        Self { repo }
    }

    /// Profile as the dashboard shows it, applying the lazy daily score reset.
    ///
    /// Absent profiles are not created here; they read as a zero score until
    /// the first completion writes one.
    pub fn dashboard_profile(&self, user_id: &str, now: DateTime<Utc>) -> Result<UserProfile> {
        let Some(mut profile) = self.repo.get(user_id)? else {
            return Ok(UserProfile::new(user_id));
        };
        if profile.refresh_daily_score(now) {
            self.repo.upsert(user_id, &ProfilePatch::reset(now))?;
            info!(user_id, "daily score reset");
        }
        Ok(profile)
    }
}
