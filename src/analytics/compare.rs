//! Period comparison
//!
//! Summarizes two date ranges independently and reports how the second
//! differs from the first: mean delta (absolute and percent) and a stability
//! delta (difference of standard deviations, positive meaning the second
//! period is more stable).

use crate::analytics::stats::std_dev_of;
use crate::store::types::MoodEntry;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// How many top tags to report per period
const TOP_TAGS: usize = 5;

/// Summary statistics for one period
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub min: Option<u8>,
    pub max: Option<u8>,
    pub std_dev: f64,
    /// Most frequent tags, descending by count (ties alphabetical), top 5
    pub top_tags: Vec<(String, usize)>,
}

/// Comparison of two periods
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodComparison {
    pub first: PeriodSummary,
    pub second: PeriodSummary,
    /// mean(second) - mean(first); `None` when either period is empty
    pub mean_delta: Option<f64>,
    /// Mean delta as a percentage of the first period's mean
    pub mean_delta_pct: Option<f64>,
    /// std_dev(first) - std_dev(second); positive = second more stable
    pub stability_delta: f64,
}

/// Summarize the entries falling on local days within `[from, to]` inclusive
pub fn summarize_period(entries: &[MoodEntry], from: NaiveDate, to: NaiveDate) -> PeriodSummary {
    let in_range: Vec<&MoodEntry> = entries
        .iter()
        .filter(|e| {
            let day = e.local_date();
            day >= from && day <= to
        })
        .collect();

    let values: Vec<u8> = in_range.iter().map(|e| e.mood.value).collect();
    let mean = (!values.is_empty())
        .then(|| values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64);

    let mut tag_counts: HashMap<&str, usize> = HashMap::new();
    for entry in &in_range {
        for tag in &entry.tags {
            *tag_counts.entry(tag.as_str()).or_default() += 1;
        }
    }
    let mut top_tags: Vec<(String, usize)> = tag_counts
        .into_iter()
        .map(|(t, c)| (t.to_string(), c))
        .collect();
    top_tags.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    top_tags.truncate(TOP_TAGS);

    PeriodSummary {
        count: values.len(),
        mean,
        min: values.iter().min().copied(),
        max: values.iter().max().copied(),
        std_dev: std_dev_of(values.iter().map(|&v| v as f64)),
        top_tags,
    }
}

/// Compare two date ranges over the same entry list
pub fn compare_periods(
    entries: &[MoodEntry],
    first: (NaiveDate, NaiveDate),
    second: (NaiveDate, NaiveDate),
) -> PeriodComparison {
    let first = summarize_period(entries, first.0, first.1);
    let second = summarize_period(entries, second.0, second.1);

    let mean_delta = match (first.mean, second.mean) {
        (Some(a), Some(b)) => Some(b - a),
        _ => None,
    };
    let mean_delta_pct = match (first.mean, mean_delta) {
        (Some(a), Some(d)) if a != 0.0 => Some(d / a * 100.0),
        _ => None,
    };
    let stability_delta = first.std_dev - second.std_dev;

    PeriodComparison {
        first,
        second,
        mean_delta,
        mean_delta_pct,
        stability_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::MoodRating;
    use chrono::{Local, TimeZone, Utc};

    fn entry_on(date: NaiveDate, mood: u8, tags: &[&str]) -> MoodEntry {
        let dt = Local
            .from_local_datetime(&date.and_hms_opt(9, 0, 0).unwrap())
            .unwrap()
            .with_timezone(&Utc);
        MoodEntry::new(MoodRating::new(mood).unwrap())
            .at(dt)
            .tags(tags.iter().copied())
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn fixture() -> Vec<MoodEntry> {
        vec![
            entry_on(day(1, 1), 2, &["work"]),
            entry_on(day(1, 3), 4, &["work", "gym"]),
            entry_on(day(1, 5), 3, &["family"]),
            entry_on(day(2, 1), 4, &["gym"]),
            entry_on(day(2, 2), 5, &["gym", "family"]),
        ]
    }

    #[test]
    fn test_summarize_period() {
        let entries = fixture();
        let summary = summarize_period(&entries, day(1, 1), day(1, 31));

        assert_eq!(summary.count, 3);
        assert!((summary.mean.unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(summary.min, Some(2));
        assert_eq!(summary.max, Some(4));
        // "work" twice, everything else once (alphabetical within ties)
        assert_eq!(summary.top_tags[0], ("work".to_string(), 2));
    }

    #[test]
    fn test_empty_period() {
        let entries = fixture();
        let summary = summarize_period(&entries, day(6, 1), day(6, 30));

        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.min, None);
        assert!(summary.top_tags.is_empty());
    }

    #[test]
    fn test_compare_periods_deltas() {
        let entries = fixture();
        let cmp = compare_periods(
            &entries,
            (day(1, 1), day(1, 31)),
            (day(2, 1), day(2, 29)),
        );

        // January mean 3.0, February mean 4.5
        assert!((cmp.mean_delta.unwrap() - 1.5).abs() < 1e-9);
        assert!((cmp.mean_delta_pct.unwrap() - 50.0).abs() < 1e-9);
        // January σ ≈ 0.816, February σ = 0.5: second period more stable
        assert!(cmp.stability_delta > 0.0);
    }

    #[test]
    fn test_compare_with_empty_side() {
        let entries = fixture();
        let cmp = compare_periods(
            &entries,
            (day(1, 1), day(1, 31)),
            (day(6, 1), day(6, 30)),
        );
        assert_eq!(cmp.mean_delta, None);
        assert_eq!(cmp.mean_delta_pct, None);
    }
}
