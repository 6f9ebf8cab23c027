//! Markdown report renderer

use crate::analytics::StatsSummary;
use crate::store::types::MoodEntry;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Render a human-readable Markdown report: summary first, then the log
pub fn to_markdown(entries: &[MoodEntry], summary: &StatsSummary) -> String {
    let mut out = String::new();

    out.push_str("# Mood Journal Report\n\n");
    out.push_str("## Summary\n\n");
    out.push_str(&format!("- Entries: {}\n", summary.total_entries));
    match summary.average_mood {
        Some(avg) => out.push_str(&format!("- Average mood: {:.2} / 5\n", avg)),
        None => out.push_str("- Average mood: no data\n"),
    }
    out.push_str(&format!("- Current streak: {} days\n", summary.current_streak));
    out.push_str(&format!("- Trend: {}\n", summary.trend));
    out.push_str(&format!("- Stability: {}\n", summary.stability));

    if let Some(best) = &summary.best_day {
        out.push_str(&format!(
            "- Best day: {} ({} - {})\n",
            best.date, best.mood, best.label
        ));
    }
    if let Some(worst) = &summary.worst_day {
        out.push_str(&format!(
            "- Worst day: {} ({} - {})\n",
            worst.date, worst.mood, worst.label
        ));
    }

    out.push_str("\n## Weekly Pattern\n\n");
    out.push_str("| Day | Average |\n|-----|---------|\n");
    for (day, avg) in WEEKDAYS.iter().zip(summary.weekly_pattern.iter()) {
        out.push_str(&format!("| {} | {:.2} |\n", day, avg));
    }

    out.push_str("\n## Entries\n\n");
    if entries.is_empty() {
        out.push_str("_No entries._\n");
    }
    for entry in entries {
        out.push_str(&format!(
            "### {} — {} ({}/5)\n\n",
            entry.local_date(),
            entry.mood.label,
            entry.mood.value
        ));
        if !entry.note.is_empty() {
            out.push_str(&format!("{}\n\n", entry.note));
        }
        if !entry.tags.is_empty() {
            out.push_str(&format!("Tags: {}\n\n", entry.tags.join(", ")));
        }
    }

    out
}
