//! Core data types for the moodlog entry store
//!
//! This module defines the fundamental types used throughout the crate:
//! - `MoodEntry`: a single logged mood observation
//! - `MoodRating`: the 1-5 mood value with its display label
//! - `Attachment`: an embedded image descriptor (opaque to analytics)
//! - `FilterState`: structured filter criteria over the entry list

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum length of a single tag after normalization
pub const MAX_TAG_LEN: usize = 30;

/// Minimum valid mood value
pub const MOOD_MIN: u8 = 1;
/// Maximum valid mood value
pub const MOOD_MAX: u8 = 5;

/// A mood value (1 = worst, 5 = best) paired with a display label
///
/// The label is presentation-only and never participates in analytics;
/// the value is validated to [1, 5] on every ingestion path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodRating {
    /// Mood value, 1-5
    pub value: u8,
    /// Display label (e.g. "Good")
    pub label: String,
}

impl MoodRating {
    /// Create a rating with the default label for a value
    ///
    /// Returns `None` when the value is outside [1, 5].
    pub fn new(value: u8) -> Option<Self> {
        Self::in_range(value).then(|| Self {
            value,
            label: Self::default_label(value).to_string(),
        })
    }

    /// Create a rating with a custom label
    pub fn with_label(value: u8, label: impl Into<String>) -> Option<Self> {
        Self::in_range(value).then(|| Self {
            value,
            label: label.into(),
        })
    }

    /// Check whether a raw value is a valid mood
    pub fn in_range(value: u8) -> bool {
        (MOOD_MIN..=MOOD_MAX).contains(&value)
    }

    /// Default display label for a mood value
    pub fn default_label(value: u8) -> &'static str {
        match value {
            1 => "Terrible",
            2 => "Bad",
            3 => "Okay",
            4 => "Good",
            5 => "Great",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for MoodRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.value, self.label)
    }
}

/// An embedded image attached to an entry
///
/// Carried through persistence and import/export untouched; analytics and
/// search never look inside.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    /// Unique attachment id
    pub id: String,
    /// Base64-encoded image bytes
    pub data: String,
    /// Original file name
    pub name: String,
    /// Decoded size in bytes
    pub size: u64,
    /// MIME type (e.g. "image/png")
    pub mime_type: String,
}

/// One logged mood observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodEntry {
    /// Unique entry id
    pub id: String,
    /// When the mood was felt/logged
    pub date: DateTime<Utc>,
    /// The mood itself
    pub mood: MoodRating,
    /// Free-text note, may be empty
    #[serde(default)]
    pub note: String,
    /// Normalized tags (lowercase, trimmed, deduplicated, insertion order)
    #[serde(default)]
    pub tags: Vec<String>,
    /// Attached images
    #[serde(default)]
    pub images: Vec<Attachment>,
}

impl MoodEntry {
    /// Create a new entry with a fresh id and the current timestamp
    pub fn new(mood: MoodRating) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date: Utc::now(),
            mood,
            note: String::new(),
            tags: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Builder method: set the timestamp
    pub fn at(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Builder method: set the note
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Builder method: set tags (normalized)
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    /// Builder method: attach an image
    pub fn image(mut self, image: Attachment) -> Self {
        self.images.push(image);
        self
    }

    /// The entry's calendar date in local time
    ///
    /// Streaks, day filters, and the weekly pattern all work on local
    /// calendar days, not 24-hour windows.
    pub fn local_date(&self) -> NaiveDate {
        self.date.with_timezone(&Local).date_naive()
    }

    /// Monday-first weekday index (0 = Monday .. 6 = Sunday), local time
    pub fn weekday_index(&self) -> usize {
        self.date
            .with_timezone(&Local)
            .weekday()
            .num_days_from_monday() as usize
    }

    /// Check whether the entry carries a specific (already normalized) tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Normalize a set of raw tags
///
/// Lowercases, trims, truncates to [`MAX_TAG_LEN`] characters, drops empties,
/// and deduplicates while preserving first-seen order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();

    for raw in tags {
        let tag: String = raw
            .as_ref()
            .trim()
            .to_lowercase()
            .chars()
            .take(MAX_TAG_LEN)
            .collect();

        if tag.is_empty() {
            continue;
        }
        if seen.insert(tag.clone()) {
            out.push(tag);
        }
    }

    out
}

/// Structured filter criteria applied conjunctively over the entry list
///
/// Date bounds are inclusive at local-day granularity: an entry logged at any
/// time on `date_to` still matches. The tag dimension matches when the entry
/// has at least one selected tag (OR within tags, AND with everything else).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterState {
    /// Inclusive lower date bound (local calendar day), absent = unbounded
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound (local calendar day), absent = unbounded
    pub date_to: Option<NaiveDate>,
    /// Inclusive minimum mood value
    pub mood_min: u8,
    /// Inclusive maximum mood value
    pub mood_max: u8,
    /// Selected tags (normalized); empty = no tag constraint
    pub tags: BTreeSet<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            date_from: None,
            date_to: None,
            mood_min: MOOD_MIN,
            mood_max: MOOD_MAX,
            tags: BTreeSet::new(),
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn mood_range(mut self, min: u8, max: u8) -> Self {
        self.mood_min = min;
        self.mood_max = max;
        self
    }

    pub fn tag(mut self, tag: impl AsRef<str>) -> Self {
        if let Some(normalized) = normalize_tags([tag]).pop() {
            self.tags.insert(normalized);
        }
        self
    }

    /// Whether the filter constrains anything beyond the defaults
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    /// Check if an entry satisfies every active dimension
    pub fn matches(&self, entry: &MoodEntry) -> bool {
        let day = entry.local_date();

        if let Some(from) = self.date_from {
            if day < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if day > to {
                return false;
            }
        }

        if entry.mood.value < self.mood_min || entry.mood.value > self.mood_max {
            return false;
        }

        if !self.tags.is_empty() && !self.tags.iter().any(|t| entry.has_tag(t)) {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry_on(year: i32, month: u32, day: u32, mood: u8) -> MoodEntry {
        let date = Local
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        MoodEntry::new(MoodRating::new(mood).unwrap()).at(date)
    }

    #[test]
    fn test_mood_rating_range() {
        assert!(MoodRating::new(0).is_none());
        assert!(MoodRating::new(6).is_none());

        let rating = MoodRating::new(4).unwrap();
        assert_eq!(rating.value, 4);
        assert_eq!(rating.label, "Good");
    }

    #[test]
    fn test_mood_rating_custom_label() {
        let rating = MoodRating::with_label(5, "Fantastic").unwrap();
        assert_eq!(rating.label, "Fantastic");
        assert!(MoodRating::with_label(9, "Nope").is_none());
    }

    #[test]
    fn test_tag_normalization() {
        let tags = normalize_tags(["  Work ", "FAMILY", "work", "", "   "]);
        assert_eq!(tags, vec!["work", "family"]);
    }

    #[test]
    fn test_tag_truncation() {
        let long = "x".repeat(50);
        let tags = normalize_tags([long.as_str()]);
        assert_eq!(tags[0].len(), MAX_TAG_LEN);
    }

    #[test]
    fn test_entry_serialization_round_trip() {
        let entry = entry_on(2024, 3, 10, 4)
            .note("a good day")
            .tags(["Work", "outdoors"]);

        let json = serde_json::to_string(&entry).unwrap();
        let restored: MoodEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, restored);
    }

    #[test]
    fn test_filter_mood_range() {
        let filter = FilterState::new().mood_range(3, 5);

        assert!(filter.matches(&entry_on(2024, 1, 1, 3)));
        assert!(filter.matches(&entry_on(2024, 1, 1, 5)));
        assert!(!filter.matches(&entry_on(2024, 1, 1, 2)));
    }

    #[test]
    fn test_filter_date_bounds_inclusive() {
        let filter = FilterState::new()
            .date_from(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
            .date_to(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());

        assert!(filter.matches(&entry_on(2024, 1, 10, 3)));
        assert!(filter.matches(&entry_on(2024, 1, 20, 3)));
        assert!(!filter.matches(&entry_on(2024, 1, 9, 3)));
        assert!(!filter.matches(&entry_on(2024, 1, 21, 3)));
    }

    #[test]
    fn test_filter_tags_or_within_dimension() {
        let filter = FilterState::new().tag("work");

        let work = entry_on(2024, 1, 1, 3).tags(["work"]);
        let family = entry_on(2024, 1, 1, 3).tags(["family"]);
        let both = entry_on(2024, 1, 1, 3).tags(["work", "family"]);

        assert!(filter.matches(&work));
        assert!(!filter.matches(&family));
        assert!(filter.matches(&both));
    }

    #[test]
    fn test_filter_default_is_inactive() {
        assert!(!FilterState::new().is_active());
        assert!(FilterState::new().tag("work").is_active());
    }
}
