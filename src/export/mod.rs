//! Export renderers
//!
//! Turns the entry collection (and its [`StatsSummary`]) into portable
//! formats: JSON (the round-trip format), CSV, a Markdown report, and
//! iCalendar. Heavier document formats (PDF, DOCX) are the concern of
//! external tooling fed from these outputs.

mod ical;
mod report;

pub use ical::to_ical;
pub use report::to_markdown;

use crate::store::types::MoodEntry;
use thiserror::Error;

/// Errors that can occur while rendering exports
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Render the collection as pretty JSON
///
/// This is the canonical backup format: importing the output in replace
/// mode reproduces the collection exactly, ids included.
pub fn to_json(entries: &[MoodEntry]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Render the collection as CSV
///
/// Columns: `date,mood,label,note,tags` with tags semicolon-joined inside
/// one cell. The csv writer quotes fields containing commas.
pub fn to_csv(entries: &[MoodEntry]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["date", "mood", "label", "note", "tags"])?;

    for entry in entries {
        writer.write_record([
            entry.date.to_rfc3339().as_str(),
            entry.mood.value.to_string().as_str(),
            entry.mood.label.as_str(),
            entry.note.as_str(),
            entry.tags.join(";").as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| {
        ExportError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
    })?;
    String::from_utf8(bytes).map_err(|e| {
        ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}
