//! Anomaly detection over a rolling window of recent entries
//!
//! Works on the most recent 30 entries (chronological order). Two detectors
//! run over the same window:
//!
//! - z-score deviation: entries more than 1.5σ from the window mean are
//!   flagged at medium severity, more than 2σ at high severity
//! - sustained low: any run of 3+ consecutive entries each below
//!   `mean - 0.5` is flagged once as a high-severity anomaly
//!
//! An entry can appear in both categories.

use crate::analytics::stats::std_dev_of;
use crate::store::types::MoodEntry;
use serde::Serialize;

/// How many recent entries form the detection window
pub const ANOMALY_WINDOW: usize = 30;

/// Minimum run length for a sustained-low anomaly
const SUSTAINED_LOW_RUN: usize = 3;

/// Severity of a detected anomaly
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

/// What kind of pattern was detected
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AnomalyKind {
    /// Single entry deviating from the window mean
    Deviation {
        /// How many standard deviations from the mean
        sigma: f64,
    },
    /// Run of consecutive entries below `mean - 0.5`
    SustainedLow {
        /// Length of the run
        run_length: usize,
    },
}

/// A detected anomaly, tied to one or more entries
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Anomaly {
    /// Ids of the affected entries (one for deviations, the run for
    /// sustained lows)
    pub entry_ids: Vec<String>,
    pub kind: AnomalyKind,
    pub severity: Severity,
}

/// Detect anomalies over the most recent [`ANOMALY_WINDOW`] entries
///
/// `entries` must be in chronological order. Fewer than 2 entries, or a
/// window with zero variance, produces no deviation anomalies.
pub fn detect_anomalies(entries: &[MoodEntry]) -> Vec<Anomaly> {
    let window = if entries.len() > ANOMALY_WINDOW {
        &entries[entries.len() - ANOMALY_WINDOW..]
    } else {
        entries
    };

    if window.len() < 2 {
        return Vec::new();
    }

    let values: Vec<f64> = window.iter().map(|e| e.mood.value as f64).collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let sd = std_dev_of(values.iter().copied());

    let mut anomalies = Vec::new();

    if sd > 0.0 {
        for (entry, &value) in window.iter().zip(&values) {
            let sigma = (value - mean).abs() / sd;
            let severity = if sigma > 2.0 {
                Severity::High
            } else if sigma > 1.5 {
                Severity::Medium
            } else {
                continue;
            };

            anomalies.push(Anomaly {
                entry_ids: vec![entry.id.clone()],
                kind: AnomalyKind::Deviation { sigma },
                severity,
            });
        }
    }

    anomalies.extend(sustained_low_runs(window, mean));
    anomalies
}

fn sustained_low_runs(window: &[MoodEntry], mean: f64) -> Vec<Anomaly> {
    let threshold = mean - 0.5;
    let mut runs = Vec::new();
    let mut current: Vec<&MoodEntry> = Vec::new();

    for entry in window {
        if (entry.mood.value as f64) < threshold {
            current.push(entry);
        } else {
            if current.len() >= SUSTAINED_LOW_RUN {
                runs.push(std::mem::take(&mut current));
            }
            current.clear();
        }
    }
    if current.len() >= SUSTAINED_LOW_RUN {
        runs.push(current);
    }

    runs.into_iter()
        .map(|run| Anomaly {
            entry_ids: run.iter().map(|e| e.id.clone()).collect(),
            kind: AnomalyKind::SustainedLow {
                run_length: run.len(),
            },
            severity: Severity::High,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::MoodRating;
    use chrono::{Duration, Utc};

    fn series(moods: &[u8]) -> Vec<MoodEntry> {
        let start = Utc::now() - Duration::days(moods.len() as i64);
        moods
            .iter()
            .enumerate()
            .map(|(i, &m)| {
                MoodEntry::new(MoodRating::new(m).unwrap()).at(start + Duration::days(i as i64))
            })
            .collect()
    }

    #[test]
    fn test_empty_and_tiny_inputs() {
        assert!(detect_anomalies(&[]).is_empty());
        assert!(detect_anomalies(&series(&[3])).is_empty());
    }

    #[test]
    fn test_zero_variance_no_deviations() {
        let entries = series(&[3; 30]);
        assert!(detect_anomalies(&entries).is_empty());
    }

    #[test]
    fn test_spike_flagged_high() {
        // 29 entries at 3, one at 5: mean ≈ 3.067, σ ≈ 0.36, the spike
        // sits well past 2σ
        let mut moods = vec![3u8; 29];
        moods.push(5);
        let entries = series(&moods);
        let spike_id = entries.last().unwrap().id.clone();

        let anomalies = detect_anomalies(&entries);
        let spike = anomalies
            .iter()
            .find(|a| a.entry_ids == vec![spike_id.clone()])
            .expect("spike should be flagged");

        assert_eq!(spike.severity, Severity::High);
        assert!(matches!(spike.kind, AnomalyKind::Deviation { sigma } if sigma > 2.0));
    }

    #[test]
    fn test_sustained_low_run() {
        // Mean pulled to ~3.7 by the 4s; the three 2s sit below mean - 0.5
        let moods = [4, 4, 4, 4, 4, 2, 2, 2, 4, 4];
        let entries = series(&moods);

        let anomalies = detect_anomalies(&entries);
        let low = anomalies
            .iter()
            .find(|a| matches!(a.kind, AnomalyKind::SustainedLow { .. }))
            .expect("sustained low should be flagged");

        assert_eq!(low.severity, Severity::High);
        assert_eq!(low.entry_ids.len(), 3);
        assert!(matches!(low.kind, AnomalyKind::SustainedLow { run_length: 3 }));
    }

    #[test]
    fn test_two_low_entries_not_a_run() {
        let moods = [4, 4, 4, 4, 4, 2, 2, 4, 4, 4];
        let entries = series(&moods);

        let anomalies = detect_anomalies(&entries);
        assert!(!anomalies
            .iter()
            .any(|a| matches!(a.kind, AnomalyKind::SustainedLow { .. })));
    }

    #[test]
    fn test_entry_can_appear_in_both_categories() {
        // A run of 1s in a field of 5s: each 1 deviates past 1.5σ AND the
        // run qualifies as sustained low
        let moods = [5, 5, 5, 5, 5, 5, 5, 1, 1, 1, 5, 5, 5, 5];
        let entries = series(&moods);
        let low_ids: Vec<String> = entries[7..10].iter().map(|e| e.id.clone()).collect();

        let anomalies = detect_anomalies(&entries);

        let deviation_ids: Vec<&String> = anomalies
            .iter()
            .filter(|a| matches!(a.kind, AnomalyKind::Deviation { .. }))
            .flat_map(|a| &a.entry_ids)
            .collect();
        for id in &low_ids {
            assert!(deviation_ids.contains(&id));
        }

        let run = anomalies
            .iter()
            .find(|a| matches!(a.kind, AnomalyKind::SustainedLow { .. }))
            .unwrap();
        assert_eq!(run.entry_ids, low_ids);
    }

    #[test]
    fn test_window_limits_to_recent_thirty() {
        // Old spike outside the window must not be flagged
        let mut moods = vec![5u8];
        moods.extend(vec![3u8; 35]);
        let entries = series(&moods);
        let old_spike = entries[0].id.clone();

        let anomalies = detect_anomalies(&entries);
        assert!(!anomalies.iter().any(|a| a.entry_ids.contains(&old_spike)));
    }
}
