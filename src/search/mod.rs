//! Search & Filter Engine
//!
//! Reduces an entry snapshot to the set matching free-text and structured
//! criteria:
//!
//! - free-text search is a case-insensitive substring match, OR'd across
//!   note, tags, mood label, and the rendered local date
//! - structured filters ([`FilterState`]) compose conjunctively (AND), with
//!   OR only inside the tag dimension
//! - when both are active, filters narrow the free-text result set
//!
//! An empty or whitespace-only query deactivates search entirely, which is a
//! different state from a query that matched nothing.

pub mod history;

pub use history::SearchHistory;

use crate::store::types::{FilterState, MoodEntry};

/// Result of a search invocation
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// No criteria active; the caller should show the full list
    Inactive,
    /// Criteria active; may legitimately be empty ("no results")
    Results(Vec<MoodEntry>),
}

impl SearchOutcome {
    /// The matched entries, or the full input when no criteria were active
    pub fn entries_or<'a>(&'a self, all: &'a [MoodEntry]) -> &'a [MoodEntry] {
        match self {
            SearchOutcome::Inactive => all,
            SearchOutcome::Results(found) => found,
        }
    }
}

/// Free-text search over the entry list
pub fn search(entries: &[MoodEntry], query: &str) -> SearchOutcome {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchOutcome::Inactive;
    }

    let found = entries
        .iter()
        .filter(|e| entry_matches(e, &needle))
        .cloned()
        .collect();
    SearchOutcome::Results(found)
}

fn entry_matches(entry: &MoodEntry, needle: &str) -> bool {
    if entry.note.to_lowercase().contains(needle) {
        return true;
    }
    if entry.tags.iter().any(|t| t.contains(needle)) {
        return true;
    }
    if entry.mood.label.to_lowercase().contains(needle) {
        return true;
    }

    // The rendered date matches in either common style
    let day = entry.local_date();
    let iso = day.format("%Y-%m-%d").to_string();
    let long = day.format("%B %-d, %Y").to_string().to_lowercase();
    iso.contains(needle) || long.contains(needle)
}

/// Apply structured filters to the entry list
pub fn apply_filters(entries: &[MoodEntry], filters: &FilterState) -> Vec<MoodEntry> {
    entries
        .iter()
        .filter(|e| filters.matches(e))
        .cloned()
        .collect()
}

/// Combined free-text search and structured filtering
///
/// The free-text pass runs first; structured filters narrow its result set.
/// Returns [`SearchOutcome::Inactive`] only when neither criterion is
/// active.
pub fn search_and_filter(
    entries: &[MoodEntry],
    query: &str,
    filters: &FilterState,
) -> SearchOutcome {
    let text_outcome = search(entries, query);

    match text_outcome {
        SearchOutcome::Inactive => {
            if filters.is_active() {
                SearchOutcome::Results(apply_filters(entries, filters))
            } else {
                SearchOutcome::Inactive
            }
        }
        SearchOutcome::Results(found) => {
            if filters.is_active() {
                SearchOutcome::Results(apply_filters(&found, filters))
            } else {
                SearchOutcome::Results(found)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::MoodRating;
    use chrono::{Local, NaiveDate, TimeZone, Utc};

    fn entry_on(date: NaiveDate, mood: u8) -> MoodEntry {
        let dt = Local
            .from_local_datetime(&date.and_hms_opt(10, 0, 0).unwrap())
            .unwrap()
            .with_timezone(&Utc);
        MoodEntry::new(MoodRating::new(mood).unwrap()).at(dt)
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn fixture() -> Vec<MoodEntry> {
        vec![
            entry_on(day(1, 5), 4).note("Coffee with Dana").tags(["friends"]),
            entry_on(day(1, 6), 2).note("Long day at the office").tags(["work"]),
            entry_on(day(2, 14), 5).note("").tags(["family", "work"]),
        ]
    }

    #[test]
    fn test_empty_query_is_inactive() {
        let entries = fixture();
        assert_eq!(search(&entries, ""), SearchOutcome::Inactive);
        assert_eq!(search(&entries, "   "), SearchOutcome::Inactive);
    }

    #[test]
    fn test_no_match_is_empty_results_not_inactive() {
        let entries = fixture();
        match search(&entries, "zzz-no-such-thing") {
            SearchOutcome::Results(found) => assert!(found.is_empty()),
            SearchOutcome::Inactive => panic!("a live query must never report Inactive"),
        }
    }

    #[test]
    fn test_search_note_case_insensitive() {
        let entries = fixture();
        let SearchOutcome::Results(found) = search(&entries, "COFFEE") else {
            panic!("expected results");
        };
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].note, "Coffee with Dana");
    }

    #[test]
    fn test_search_matches_tags_and_label() {
        let entries = fixture();

        let SearchOutcome::Results(by_tag) = search(&entries, "work") else {
            panic!()
        };
        assert_eq!(by_tag.len(), 2);

        // Mood 5 has the default label "Great"
        let SearchOutcome::Results(by_label) = search(&entries, "great") else {
            panic!()
        };
        assert_eq!(by_label.len(), 1);
        assert_eq!(by_label[0].mood.value, 5);
    }

    #[test]
    fn test_search_matches_date_strings() {
        let entries = fixture();

        let SearchOutcome::Results(by_iso) = search(&entries, "2024-02-14") else {
            panic!()
        };
        assert_eq!(by_iso.len(), 1);

        let SearchOutcome::Results(by_long) = search(&entries, "february") else {
            panic!()
        };
        assert_eq!(by_long.len(), 1);
    }

    #[test]
    fn test_search_is_idempotent() {
        let entries = fixture();
        let first = search(&entries, "work");
        let SearchOutcome::Results(found) = &first else {
            panic!()
        };
        let second = search(found, "work");
        assert_eq!(first, second);
    }

    #[test]
    fn test_filters_narrow_search_results() {
        let entries = fixture();
        let filters = FilterState::new().mood_range(4, 5);

        // "work" matches two entries; the mood filter keeps only the 5
        let SearchOutcome::Results(found) = search_and_filter(&entries, "work", &filters) else {
            panic!()
        };
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].mood.value, 5);
    }

    #[test]
    fn test_filter_only_invocation() {
        let entries = fixture();
        let filters = FilterState::new().tag("friends");

        let SearchOutcome::Results(found) = search_and_filter(&entries, "", &filters) else {
            panic!()
        };
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_nothing_active_is_inactive() {
        let entries = fixture();
        assert_eq!(
            search_and_filter(&entries, "  ", &FilterState::new()),
            SearchOutcome::Inactive
        );
    }

    #[test]
    fn test_tag_filter_matches_any_selected_tag() {
        let entries = vec![
            entry_on(day(3, 1), 3).tags(["work"]),
            entry_on(day(3, 2), 3).tags(["family"]),
            entry_on(day(3, 3), 3).tags(["work", "family"]),
        ];
        let filters = FilterState::new().tag("work");

        let found = apply_filters(&entries, &filters);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|e| e.has_tag("work")));
    }

    #[test]
    fn test_overlong_tag_filter_matches_truncated_stored_tag() {
        // Stored tags are truncated to 30 chars; a filter built from the
        // same raw input must normalize identically or it can never match
        let long = "x".repeat(40);
        let entries = vec![entry_on(day(3, 4), 3).tags([long.as_str()])];
        let filters = FilterState::new().tag(long.as_str());

        let found = apply_filters(&entries, &filters);
        assert_eq!(found.len(), 1);
    }
}
