//! JSON import
//!
//! Accepts a JSON array of entry-shaped objects. A non-array payload is
//! rejected outright before anything is produced; individual elements that
//! fail validation (malformed shape, mood outside 1-5) are skipped and
//! counted. Ids are preserved so that an exported collection re-imports
//! exactly.

use super::{ImportError, ImportReport};
use crate::store::types::{normalize_tags, MoodEntry, MoodRating};

/// Import entries from JSON text
pub fn import_json_str(json_data: &str) -> Result<ImportReport, ImportError> {
    let value: serde_json::Value =
        serde_json::from_str(json_data).map_err(|e| ImportError::ParseError(e.to_string()))?;

    let serde_json::Value::Array(elements) = value else {
        return Err(ImportError::NotAnArray);
    };

    let mut entries = Vec::new();
    let mut rows_skipped = 0;
    let mut errors = Vec::new();

    for (idx, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<MoodEntry>(element) {
            Ok(mut entry) => {
                if !MoodRating::in_range(entry.mood.value) {
                    errors.push(format!(
                        "Element {}: mood out of range: {}",
                        idx, entry.mood.value
                    ));
                    rows_skipped += 1;
                    continue;
                }
                entry.tags = normalize_tags(&entry.tags);
                entries.push(entry);
            }
            Err(e) => {
                errors.push(format!("Element {}: {}", idx, e));
                rows_skipped += 1;
            }
        }
    }

    Ok(ImportReport {
        entries,
        rows_skipped,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::MoodRating;

    fn sample_json() -> String {
        let entries = vec![
            MoodEntry::new(MoodRating::new(4).unwrap())
                .note("exported")
                .tags(["Work"]),
            MoodEntry::new(MoodRating::new(2).unwrap()),
        ];
        serde_json::to_string(&entries).unwrap()
    }

    #[test]
    fn test_array_round_trip_preserves_ids() {
        let json = sample_json();
        let original: Vec<MoodEntry> = serde_json::from_str(&json).unwrap();

        let report = import_json_str(&json).unwrap();
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.rows_skipped, 0);
        assert_eq!(report.entries[0].id, original[0].id);
        assert_eq!(report.entries, original);
    }

    #[test]
    fn test_non_array_rejected() {
        let result = import_json_str(r#"{"entries": []}"#);
        assert!(matches!(result, Err(ImportError::NotAnArray)));

        let result = import_json_str("not json at all");
        assert!(matches!(result, Err(ImportError::ParseError(_))));
    }

    #[test]
    fn test_bad_element_skipped() {
        let mut elements: Vec<serde_json::Value> = serde_json::from_str(&sample_json()).unwrap();
        elements.push(serde_json::json!({ "this": "is not an entry" }));
        // Well-formed but out-of-range mood
        elements.push(serde_json::json!({
            "id": "x",
            "date": "2024-01-01T12:00:00Z",
            "mood": { "value": 9, "label": "impossible" },
        }));
        let json = serde_json::to_string(&elements).unwrap();

        let report = import_json_str(&json).unwrap();
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.rows_skipped, 2);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_tags_renormalized_on_ingestion() {
        let json = r#"[{
            "id": "abc",
            "date": "2024-01-01T12:00:00Z",
            "mood": { "value": 3, "label": "Okay" },
            "tags": ["  MIXED Case ", "dup", "dup"]
        }]"#;

        let report = import_json_str(json).unwrap();
        assert_eq!(report.entries[0].tags, vec!["mixed case", "dup"]);
    }
}
