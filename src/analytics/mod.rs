//! Moodlog Analytics
//!
//! Pure computations over a chronological entry snapshot:
//!
//! - **stats**: averages, streaks, trend, stability, weekly pattern
//! - **anomaly**: z-score deviation and sustained-low run detection
//! - **predict**: least-squares mood forecast with decaying confidence
//! - **compare**: period-over-period summaries and deltas
//!
//! None of these perform I/O and none of them fail; empty input produces
//! sentinel values (`None`, `InsufficientData`, a zero streak).

pub mod anomaly;
pub mod compare;
pub mod predict;
pub mod stats;

pub use anomaly::{detect_anomalies, Anomaly, AnomalyKind, Severity, ANOMALY_WINDOW};
pub use compare::{compare_periods, summarize_period, PeriodComparison, PeriodSummary};
pub use predict::{fit_trend, predict_mood, Prediction, TrendLine, DEFAULT_HORIZON};
pub use stats::{
    average_mood, best_day, current_streak, mood_stability, mood_trend, population_std_dev,
    weekly_pattern, worst_day, MoodStability, MoodTrend,
};

use crate::store::types::MoodEntry;
use chrono::NaiveDate;
use serde::Serialize;

/// A single highlighted day in the summary
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayHighlight {
    pub date: NaiveDate,
    pub mood: u8,
    pub label: String,
}

impl DayHighlight {
    fn from_entry(entry: &MoodEntry) -> Self {
        Self {
            date: entry.local_date(),
            mood: entry.mood.value,
            label: entry.mood.label.clone(),
        }
    }
}

/// The dashboard-shaped summary consumed by exporters and the CLI
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsSummary {
    pub total_entries: usize,
    pub average_mood: Option<f64>,
    pub current_streak: u32,
    pub trend: MoodTrend,
    pub stability: MoodStability,
    pub std_dev: f64,
    /// Mean mood per weekday, Monday-first; 0.0 for untracked weekdays
    pub weekly_pattern: [f64; 7],
    pub best_day: Option<DayHighlight>,
    pub worst_day: Option<DayHighlight>,
}

/// Compute the full summary from a chronological snapshot
pub fn generate_stats(entries: &[MoodEntry], as_of: NaiveDate) -> StatsSummary {
    StatsSummary {
        total_entries: entries.len(),
        average_mood: average_mood(entries),
        current_streak: current_streak(entries, as_of),
        trend: mood_trend(entries),
        stability: mood_stability(entries),
        std_dev: population_std_dev(entries),
        weekly_pattern: weekly_pattern(entries),
        best_day: best_day(entries).map(DayHighlight::from_entry),
        worst_day: worst_day(entries).map(DayHighlight::from_entry),
    }
}
