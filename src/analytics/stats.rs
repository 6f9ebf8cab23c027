//! Statistics over the entry list
//!
//! Pure functions computing scalar and array summaries from a chronological
//! snapshot. Everything is recomputed on demand from the full list; nothing
//! is maintained incrementally. At journal scale these are all trivial
//! passes.

use crate::store::types::MoodEntry;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

/// Qualitative trend direction from comparing two recent windows
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum MoodTrend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl std::fmt::Display for MoodTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoodTrend::Improving => write!(f, "Improving"),
            MoodTrend::Declining => write!(f, "Declining"),
            MoodTrend::Stable => write!(f, "Stable"),
            MoodTrend::InsufficientData => write!(f, "Insufficient Data"),
        }
    }
}

/// Qualitative mood stability, bucketed from the population standard deviation
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum MoodStability {
    VeryStable,
    Stable,
    Moderate,
    Variable,
}

impl std::fmt::Display for MoodStability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoodStability::VeryStable => write!(f, "Very Stable"),
            MoodStability::Stable => write!(f, "Stable"),
            MoodStability::Moderate => write!(f, "Moderate"),
            MoodStability::Variable => write!(f, "Variable"),
        }
    }
}

/// Arithmetic mean of mood values; `None` for an empty list
pub fn average_mood(entries: &[MoodEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let sum: f64 = entries.iter().map(|e| e.mood.value as f64).sum();
    Some(sum / entries.len() as f64)
}

/// Consecutive local calendar days with at least one entry, walking backward
/// from `as_of` and stopping at the first gap
///
/// Day matching is calendar-date equality in local time, not 24-hour
/// windows: an entry logged at 23:59 counts for that whole day.
pub fn current_streak(entries: &[MoodEntry], as_of: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = entries.iter().map(|e| e.local_date()).collect();

    let mut streak = 0;
    let mut day = as_of;
    while days.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Compare the mean of the most recent 7 entries against the preceding 7
///
/// Fewer than 2 entries is `InsufficientData`; fewer than 14 (no older
/// window to compare against) is `Stable`. The delta must exceed ±0.5 to
/// leave `Stable`.
pub fn mood_trend(entries: &[MoodEntry]) -> MoodTrend {
    if entries.len() < 2 {
        return MoodTrend::InsufficientData;
    }
    if entries.len() < 14 {
        return MoodTrend::Stable;
    }

    let n = entries.len();
    let recent = mean_of(&entries[n - 7..]);
    let previous = mean_of(&entries[n - 14..n - 7]);
    let delta = recent - previous;

    if delta > 0.5 {
        MoodTrend::Improving
    } else if delta < -0.5 {
        MoodTrend::Declining
    } else {
        MoodTrend::Stable
    }
}

fn mean_of(entries: &[MoodEntry]) -> f64 {
    entries.iter().map(|e| e.mood.value as f64).sum::<f64>() / entries.len() as f64
}

/// Population standard deviation of mood values; 0.0 for empty input
pub fn population_std_dev(entries: &[MoodEntry]) -> f64 {
    std_dev_of(entries.iter().map(|e| e.mood.value as f64))
}

pub(crate) fn std_dev_of(values: impl IntoIterator<Item = f64>) -> f64 {
    let values: Vec<f64> = values.into_iter().collect();
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Bucket the population standard deviation into a qualitative label
///
/// Thresholds: 0.5, 1.0, 1.5.
pub fn mood_stability(entries: &[MoodEntry]) -> MoodStability {
    let sd = population_std_dev(entries);
    if sd < 0.5 {
        MoodStability::VeryStable
    } else if sd < 1.0 {
        MoodStability::Stable
    } else if sd < 1.5 {
        MoodStability::Moderate
    } else {
        MoodStability::Variable
    }
}

/// Mean mood per local weekday, Monday-first
///
/// Weekdays with zero entries report 0.0 rather than being excluded. This
/// mirrors the journal's dashboard, where an untracked day drags the visible
/// average down; a deliberate display choice, preserved and pinned by tests.
pub fn weekly_pattern(entries: &[MoodEntry]) -> [f64; 7] {
    let mut sums = [0.0f64; 7];
    let mut counts = [0usize; 7];

    for entry in entries {
        let idx = entry.weekday_index();
        sums[idx] += entry.mood.value as f64;
        counts[idx] += 1;
    }

    let mut pattern = [0.0f64; 7];
    for i in 0..7 {
        if counts[i] > 0 {
            pattern[i] = sums[i] / counts[i] as f64;
        }
    }
    pattern
}

/// Entry with the highest mood value; ties resolve to the first encountered
pub fn best_day(entries: &[MoodEntry]) -> Option<&MoodEntry> {
    entries
        .iter()
        .fold(None, |best: Option<&MoodEntry>, e| match best {
            Some(b) if e.mood.value > b.mood.value => Some(e),
            Some(b) => Some(b),
            None => Some(e),
        })
}

/// Entry with the lowest mood value; ties resolve to the first encountered
pub fn worst_day(entries: &[MoodEntry]) -> Option<&MoodEntry> {
    entries
        .iter()
        .fold(None, |worst: Option<&MoodEntry>, e| match worst {
            Some(w) if e.mood.value < w.mood.value => Some(e),
            Some(w) => Some(w),
            None => Some(e),
        })
}
