//! iCalendar export
//!
//! One VEVENT per entry: UID is the entry id, DTSTART the entry timestamp,
//! SUMMARY the mood label, DESCRIPTION the note. Text values are escaped
//! per RFC 5545 (backslash, comma, semicolon, newline).

use crate::store::types::MoodEntry;
use chrono::Utc;

/// Render the collection as an iCalendar document
pub fn to_ical(entries: &[MoodEntry]) -> String {
    let mut out = String::new();
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    out.push_str("BEGIN:VCALENDAR\r\n");
    out.push_str("VERSION:2.0\r\n");
    out.push_str("PRODID:-//moodlog//EN\r\n");

    for entry in entries {
        out.push_str("BEGIN:VEVENT\r\n");
        out.push_str(&format!("UID:{}@moodlog\r\n", entry.id));
        out.push_str(&format!("DTSTAMP:{}\r\n", stamp));
        out.push_str(&format!(
            "DTSTART:{}\r\n",
            entry.date.format("%Y%m%dT%H%M%SZ")
        ));
        out.push_str(&format!(
            "SUMMARY:{}\r\n",
            escape_text(&format!("Mood: {} ({}/5)", entry.mood.label, entry.mood.value))
        ));
        if !entry.note.is_empty() {
            out.push_str(&format!("DESCRIPTION:{}\r\n", escape_text(&entry.note)));
        }
        if !entry.tags.is_empty() {
            out.push_str(&format!(
                "CATEGORIES:{}\r\n",
                entry.tags.iter().map(|t| escape_text(t)).collect::<Vec<_>>().join(",")
            ));
        }
        out.push_str("END:VEVENT\r\n");
    }

    out.push_str("END:VCALENDAR\r\n");
    out
}

fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\n', "\\n")
}
