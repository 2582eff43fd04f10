use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::time::same_day;

/// Per-user aggregate: today's score and the unlocked achievement set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub zenith_score: i64,
    #[serde(default)]
    pub score_last_updated: Option<DateTime<Utc>>,
    // append-only
    #[serde(default)]
    pub unlocked_achievements: BTreeSet<String>,
}

impl UserProfile {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Default::default()
        }
    }

    /// Lazy daily reset. Returns true when the score was zeroed.
    pub fn refresh_daily_score(&mut self, now: DateTime<Utc>) -> bool {
        if same_day(self.score_last_updated, Some(now)) {
            return false;
        }
        self.zenith_score = 0;
        self.score_last_updated = Some(now);
        true
    }

    pub fn has_unlocked(&self, achievement_id: &str) -> bool {
        self.unlocked_achievements.contains(achievement_id)
    }

    pub fn apply(&mut self, patch: &ProfilePatch) {
        match patch.score {
            Some(ScoreWrite::Set(v)) => self.zenith_score = v,
            Some(ScoreWrite::Increment(n)) => self.zenith_score += n,
            None => {}
        }
        if let Some(ts) = patch.score_last_updated {
            self.score_last_updated = Some(ts);
        }
        for id in &patch.add_achievements {
            self.unlocked_achievements.insert(id.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreWrite {
    Set(i64),
    Increment(i64),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub score: Option<ScoreWrite>,
    pub score_last_updated: Option<DateTime<Utc>>,
    pub add_achievements: Vec<String>,
}

impl ProfilePatch {
    pub fn increment(n: i64) -> Self {
        Self { score: Some(ScoreWrite::Increment(n)), ..Default::default() }
    }

    pub fn reset(now: DateTime<Utc>) -> Self {
        Self {
            score: Some(ScoreWrite::Set(0)),
            score_last_updated: Some(now),
            ..Default::default()
        }
    }

    pub fn unlock(ids: Vec<String>) -> Self {
        Self { add_achievements: ids, ..Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_refresh_daily_score() {
        let now = Utc::now();
        let mut profile = UserProfile::new("u1");
        profile.zenith_score = 40;
        profile.score_last_updated = Some(now - Duration::days(1));

        assert!(profile.refresh_daily_score(now));
        assert_eq!(profile.zenith_score, 0);
        assert_eq!(profile.score_last_updated, Some(now));

        profile.zenith_score = 15;
        assert!(!profile.refresh_daily_score(now));
        assert_eq!(profile.zenith_score, 15);
    }

    #[test]
    fn test_never_updated_profile_resets() {
        let mut profile = UserProfile::new("u1");
        assert!(profile.refresh_daily_score(Utc::now()));
    }

    #[test]
    fn test_apply_patch() {
        let mut profile = UserProfile::new("u1");
        profile.apply(&ProfilePatch::increment(10));
        profile.apply(&ProfilePatch::increment(15));
        assert_eq!(profile.zenith_score, 25);

        profile.apply(&ProfilePatch::unlock(vec!["first_step".into()]));
        profile.apply(&ProfilePatch::unlock(vec!["first_step".into()]));
        assert_eq!(profile.unlocked_achievements.len(), 1);
        assert!(profile.has_unlocked("first_step"));
    }
}
