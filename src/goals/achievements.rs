//! Achievement catalog and unlock tracking
//!
//! Achievements are fixed conditions evaluated against the whole collection
//! on every save. Once unlocked they stay unlocked, even if the underlying
//! condition later stops holding (e.g. entries deleted).

use crate::analytics::stats::{average_mood, current_streak};
use crate::store::types::MoodEntry;
use chrono::Local;
use serde::Serialize;
use std::path::Path;

/// One achievement definition
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    condition: Condition,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Condition {
    EntryCount(usize),
    Streak(u32),
    AverageAtLeast(f64),
}

/// The static achievement catalog
pub fn achievement_catalog() -> &'static [Achievement] {
    &[
        Achievement {
            id: "first_entry",
            name: "First Step",
            description: "Log your first mood entry",
            condition: Condition::EntryCount(1),
        },
        Achievement {
            id: "ten_entries",
            name: "Getting Into It",
            description: "Log 10 entries",
            condition: Condition::EntryCount(10),
        },
        Achievement {
            id: "fifty_entries",
            name: "Dedicated Journaler",
            description: "Log 50 entries",
            condition: Condition::EntryCount(50),
        },
        Achievement {
            id: "week_streak",
            name: "One Week Strong",
            description: "Log entries 7 days in a row",
            condition: Condition::Streak(7),
        },
        Achievement {
            id: "month_streak",
            name: "Habit Formed",
            description: "Log entries 30 days in a row",
            condition: Condition::Streak(30),
        },
        Achievement {
            id: "sunny_outlook",
            name: "Sunny Outlook",
            description: "Keep an average mood of 4.0 or better",
            condition: Condition::AverageAtLeast(4.0),
        },
    ]
}

impl Achievement {
    fn holds(&self, entries: &[MoodEntry]) -> bool {
        match self.condition {
            Condition::EntryCount(n) => entries.len() >= n,
            Condition::Streak(days) => {
                current_streak(entries, Local::now().date_naive()) >= days
            }
            Condition::AverageAtLeast(threshold) => {
                average_mood(entries).is_some_and(|avg| avg >= threshold)
            }
        }
    }
}

/// Remembers which achievements have been unlocked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AchievementTracker {
    unlocked: Vec<String>,
}

impl AchievementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load unlocked ids from a JSON file; missing/corrupt yields empty
    pub fn load(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::new();
        };
        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(unlocked) => Self { unlocked },
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Corrupt achievement file, starting empty");
                Self::new()
            }
        }
    }

    /// Save unlocked ids to a JSON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.unlocked)?;
        std::fs::write(path, content)
    }

    /// Evaluate the catalog; returns achievements newly unlocked this pass
    pub fn evaluate(&mut self, entries: &[MoodEntry]) -> Vec<Achievement> {
        let mut newly = Vec::new();
        for achievement in achievement_catalog() {
            if self.unlocked.iter().any(|id| id == achievement.id) {
                continue;
            }
            if achievement.holds(entries) {
                self.unlocked.push(achievement.id.to_string());
                newly.push(achievement.clone());
            }
        }
        newly
    }

    /// Ids unlocked so far
    pub fn unlocked(&self) -> &[String] {
        &self.unlocked
    }
}
