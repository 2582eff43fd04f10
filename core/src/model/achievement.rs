use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregate statistics achievements are judged against.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total_completed: usize,
    pub longest_streak: u32,
}

#[derive(Clone, Copy)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub condition: fn(&TaskStats) -> bool,
}

impl fmt::Debug for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Achievement").field("id", &self.id).field("title", &self.title).finish()
    }
}

impl Achievement {
    pub fn is_met(&self, stats: &TaskStats) -> bool {
        (self.condition)(stats)
    }
}

pub static ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first_step",
        title: "First Step",
        description: "Complete your very first task.",
        icon: "🌳",
        condition: |s| s.total_completed >= 1,
    },
    Achievement {
        id: "task_novice",
        title: "Task Novice",
        description: "Complete 5 tasks.",
        icon: "⭐",
        condition: |s| s.total_completed >= 5,
    },
    Achievement {
        id: "on_a_roll",
        title: "On a Roll!",
        description: "Reach a 3-day streak on any task.",
        icon: "🔥",
        condition: |s| s.longest_streak >= 3,
    },
    Achievement {
        id: "week_warrior",
        title: "Week Warrior",
        description: "Maintain a 7-day streak.",
        icon: "🛡",
        condition: |s| s.longest_streak >= 7,
    },
];
