//! Goals and achievements
//!
//! Both are derived state over the entry collection: a goal is a
//! user-defined target with an enable flag, an achievement is a fixed
//! catalog condition unlocked once and remembered. The store re-evaluates
//! achievements on every save; at journal scale the full rescan is cheap.

mod achievements;

pub use achievements::{achievement_catalog, Achievement, AchievementTracker};

use crate::analytics::stats::{average_mood, current_streak};
use crate::store::types::MoodEntry;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a goal measures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "target")]
pub enum GoalCondition {
    /// Consecutive-day logging streak of at least N days
    Streak(u32),
    /// Total entry count of at least N
    EntryCount(usize),
    /// Overall average mood of at least this value
    AverageMood(f64),
}

/// A user-defined goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub condition: GoalCondition,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(name: impl Into<String>, condition: GoalCondition) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            condition,
            enabled: true,
            created_at: Utc::now(),
        }
    }
}

/// Progress of one goal against the current collection
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoalProgress {
    pub goal_id: String,
    pub name: String,
    pub current: f64,
    pub target: f64,
    pub met: bool,
}

/// The persisted goal list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GoalBook {
    goals: Vec<Goal>,
}

impl GoalBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; missing or corrupt files yield an empty book
    pub fn load(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::new();
        };
        match serde_json::from_str(&content) {
            Ok(book) => book,
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Corrupt goal file, starting empty");
                Self::new()
            }
        }
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
    }

    pub fn add(&mut self, goal: Goal) {
        self.goals.push(goal);
    }

    /// Remove a goal by id; returns whether anything was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        self.goals.len() != before
    }

    /// Flip a goal's enabled flag; returns the new state if found
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let goal = self.goals.iter_mut().find(|g| g.id == id)?;
        goal.enabled = !goal.enabled;
        Some(goal.enabled)
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Evaluate every enabled goal against the collection
    pub fn progress(&self, entries: &[MoodEntry], as_of: NaiveDate) -> Vec<GoalProgress> {
        self.goals
            .iter()
            .filter(|g| g.enabled)
            .map(|g| evaluate_goal(g, entries, as_of))
            .collect()
    }
}

fn evaluate_goal(goal: &Goal, entries: &[MoodEntry], as_of: NaiveDate) -> GoalProgress {
    let (current, target) = match goal.condition {
        GoalCondition::Streak(days) => (current_streak(entries, as_of) as f64, days as f64),
        GoalCondition::EntryCount(count) => (entries.len() as f64, count as f64),
        GoalCondition::AverageMood(threshold) => {
            (average_mood(entries).unwrap_or(0.0), threshold)
        }
    };

    GoalProgress {
        goal_id: goal.id.clone(),
        name: goal.name.clone(),
        current,
        target,
        met: current >= target,
    }
}
