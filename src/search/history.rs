//! Persisted search history
//!
//! A small most-recent-first list of free-text queries, capped at 10.
//! Only live free-text searches are recorded; filter-only invocations never
//! touch the history.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum number of remembered queries
pub const MAX_HISTORY: usize = 10;

/// Most-recent-first search history
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchHistory {
    queries: Vec<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; missing or corrupt files yield empty history
    pub fn load(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::new();
        };
        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(queries) => Self { queries },
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Corrupt search history, starting empty");
                Self::new()
            }
        }
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.queries)?;
        std::fs::write(path, content)
    }

    /// Record a free-text query
    ///
    /// Empty/whitespace queries are ignored. An existing entry matching
    /// case-insensitively moves to the front instead of duplicating.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let lower = query.to_lowercase();
        self.queries.retain(|q| q.to_lowercase() != lower);
        self.queries.insert(0, query.to_string());
        self.queries.truncate(MAX_HISTORY);
    }

    /// Remembered queries, most recent first
    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.queries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_record_most_recent_first() {
        let mut history = SearchHistory::new();
        history.record("coffee");
        history.record("work");

        assert_eq!(history.queries(), &["work", "coffee"]);
    }

    #[test]
    fn test_ignores_blank_queries() {
        let mut history = SearchHistory::new();
        history.record("");
        history.record("   ");
        assert!(history.is_empty());
    }

    #[test]
    fn test_dedup_case_insensitive() {
        let mut history = SearchHistory::new();
        history.record("Coffee");
        history.record("work");
        history.record("COFFEE");

        assert_eq!(history.queries(), &["COFFEE", "work"]);
    }

    #[test]
    fn test_cap_at_ten() {
        let mut history = SearchHistory::new();
        for i in 0..15 {
            history.record(&format!("query-{i}"));
        }

        assert_eq!(history.queries().len(), MAX_HISTORY);
        assert_eq!(history.queries()[0], "query-14");
        assert_eq!(history.queries()[MAX_HISTORY - 1], "query-5");
    }

    #[test]
    fn test_load_save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("search_history.json");

        let mut history = SearchHistory::new();
        history.record("gym");
        history.record("family dinner");
        history.save(&path).unwrap();

        let restored = SearchHistory::load(&path);
        assert_eq!(restored, history);
    }

    #[test]
    fn test_load_missing_or_corrupt() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(SearchHistory::load(&missing).is_empty());

        let corrupt = dir.path().join("bad.json");
        std::fs::write(&corrupt, "{broken").unwrap();
        assert!(SearchHistory::load(&corrupt).is_empty());
    }
}
