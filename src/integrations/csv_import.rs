//! CSV import
//!
//! Parses mood entries from CSV with a required header row. `date` and
//! `mood` columns are mandatory and their absence fails the whole import
//! before any row is read; `note`, `tags` (semicolon-separated inside the
//! cell), and `label` are optional. Quoted fields containing commas are
//! handled by the csv reader.
//!
//! Row-level problems never abort the import: a row with an unparseable
//! date or a mood outside 1-5 is skipped, counted, and described in the
//! report.

use super::{ImportError, ImportReport};
use crate::store::types::{normalize_tags, MoodEntry, MoodRating};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::path::Path;

/// Column positions resolved from the header row
struct ColumnMap {
    date: usize,
    mood: usize,
    note: Option<usize>,
    tags: Option<usize>,
    label: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, ImportError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        Ok(Self {
            date: find("date").ok_or_else(|| ImportError::MissingColumn("date".into()))?,
            mood: find("mood").ok_or_else(|| ImportError::MissingColumn("mood".into()))?,
            note: find("note"),
            tags: find("tags"),
            label: find("label"),
        })
    }
}

/// Import entries from a CSV file
pub fn import_csv_path(path: &Path) -> Result<ImportReport, ImportError> {
    let raw = std::fs::read_to_string(path)?;
    import_csv_str(&raw)
}

/// Import entries from CSV text
pub fn import_csv_str(csv_data: &str) -> Result<ImportReport, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut entries = Vec::new();
    let mut rows_skipped = 0;
    let mut errors = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        let actual_line = line_num + 2; // header occupies line 1

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                errors.push(format!("Line {}: {}", actual_line, e));
                rows_skipped += 1;
                continue;
            }
        };

        match parse_row(&record, &columns) {
            Ok(entry) => entries.push(entry),
            Err(reason) => {
                errors.push(format!("Line {}: {}", actual_line, reason));
                rows_skipped += 1;
            }
        }
    }

    // Cap the error list for pathological files
    if errors.len() > 100 {
        let total = errors.len();
        errors.truncate(100);
        errors.push(format!("... and {} more errors", total - 100));
    }

    Ok(ImportReport {
        entries,
        rows_skipped,
        errors,
    })
}

fn parse_row(record: &csv::StringRecord, columns: &ColumnMap) -> Result<MoodEntry, String> {
    let date_str = record
        .get(columns.date)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or("missing date value")?;
    let date = parse_date(date_str).ok_or_else(|| format!("unparseable date: {}", date_str))?;

    let mood_str = record
        .get(columns.mood)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or("missing mood value")?;
    let value: u8 = mood_str
        .parse()
        .map_err(|_| format!("non-numeric mood: {}", mood_str))?;

    let label = columns
        .label
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let mood = match label {
        Some(label) => MoodRating::with_label(value, label),
        None => MoodRating::new(value),
    }
    .ok_or_else(|| format!("mood out of range: {}", value))?;

    let note = columns
        .note
        .and_then(|i| record.get(i))
        .map(str::trim)
        .unwrap_or("")
        .to_string();

    let tags = columns
        .tags
        .and_then(|i| record.get(i))
        .map(|cell| normalize_tags(cell.split(';')))
        .unwrap_or_default();

    let mut entry = MoodEntry::new(mood).at(date).note(note);
    entry.tags = tags;
    Ok(entry)
}

/// Parse a timestamp in common formats
///
/// Date-only values land at local noon so the entry stays on the same
/// calendar day regardless of timezone.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_to_utc(dt);
        }
    }

    let date_formats = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"];
    for fmt in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return local_to_utc(date.and_hms_opt(12, 0, 0)?);
        }
    }

    None
}

fn local_to_utc(dt: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&dt)
        .earliest()
        .map(|d| d.with_timezone(&Utc))
}
