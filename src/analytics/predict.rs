//! Mood trend prediction
//!
//! Ordinary least-squares linear regression over the most recent 14 entries
//! (x = sequence index within the window, y = mood value), extrapolated
//! forward for a configurable horizon.
//!
//! The confidence score is a fixed decay communicating decreasing certainty,
//! not a statistically derived interval: `max(0.3, 1 - 0.1 * days_ahead)`.

use crate::store::types::MoodEntry;
use serde::Serialize;

/// How many recent entries feed the regression
pub const REGRESSION_WINDOW: usize = 14;

/// Default forecast horizon in days
pub const DEFAULT_HORIZON: usize = 7;

/// One forecast point
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Prediction {
    /// Days past the last entry (1-based)
    pub days_ahead: usize,
    /// Predicted mood value, clamped to [1, 5]
    pub value: f64,
    /// Decaying confidence score in [0.3, 0.9]
    pub confidence: f64,
}

/// Fitted regression line over the prediction window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    /// Number of entries the fit used
    pub sample_size: usize,
}

/// Fit a least-squares line over the most recent entries
///
/// Returns `None` for fewer than 2 entries (no line to fit). `entries` must
/// be chronological.
pub fn fit_trend(entries: &[MoodEntry]) -> Option<TrendLine> {
    let window = if entries.len() > REGRESSION_WINDOW {
        &entries[entries.len() - REGRESSION_WINDOW..]
    } else {
        entries
    };

    let n = window.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = window.iter().map(|e| e.mood.value as f64).sum();
    let sum_xy: f64 = window
        .iter()
        .enumerate()
        .map(|(i, e)| i as f64 * e.mood.value as f64)
        .sum();
    let sum_xx: f64 = (0..n).map(|i| (i as f64).powi(2)).sum();

    let denom = nf * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return None;
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / nf;

    Some(TrendLine {
        slope,
        intercept,
        sample_size: n,
    })
}

/// Forecast mood for `horizon` days past the last entry
///
/// Empty output for fewer than 2 entries. Values clamp to [1, 5];
/// confidence decays by 0.1 per day with a floor of 0.3.
pub fn predict_mood(entries: &[MoodEntry], horizon: usize) -> Vec<Prediction> {
    let Some(line) = fit_trend(entries) else {
        return Vec::new();
    };

    (1..=horizon)
        .map(|days_ahead| {
            let x = (line.sample_size - 1 + days_ahead) as f64;
            let raw = line.intercept + line.slope * x;
            Prediction {
                days_ahead,
                value: raw.clamp(1.0, 5.0),
                confidence: (1.0 - 0.1 * days_ahead as f64).max(0.3),
            }
        })
        .collect()
}
