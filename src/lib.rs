//! # Moodlog
//!
//! Mood journal analytics - a Rust library and CLI for storing, searching,
//! and analyzing a personal mood journal.
//!
//! ## Features
//!
//! - **Simple storage**: One JSON document, rewritten whole per mutation
//! - **Optional obfuscation**: Passphrase-keyed encoding of the store file
//! - **Analytics**: Streaks, trend, stability, weekly patterns, anomalies,
//!   short-range forecasts, period comparison
//! - **Search**: Free-text plus structured filters with MRU history
//! - **Portability**: CSV/JSON import, JSON/CSV/Markdown/iCalendar export
//! - **Motivation**: User goals and a fixed achievement catalog
//! - **Events**: Signed webhook notifications for store changes
//!
//! ## Modules
//!
//! - [`store`]: The persisted entry collection and background sync
//! - [`analytics`]: Pure computations over an entry snapshot
//! - [`search`]: Free-text search, structured filters, search history
//! - [`integrations`]: CSV/JSON import and outbound webhooks
//! - [`export`]: JSON, CSV, Markdown, and iCalendar renderers
//! - [`goals`]: User goals and the achievement catalog
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moodlog::store::{EntryStore, MoodEntry, MoodRating, StoreConfig};
//! use moodlog::analytics::generate_stats;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Open the store
//!     let store = EntryStore::open(StoreConfig::new("./data")).await?;
//!
//!     // Log today's mood
//!     let rating = MoodRating::new(4).ok_or("mood out of range")?;
//!     store
//!         .add(MoodEntry::new(rating).note("Long walk, good coffee").tags(["outdoors"]))
//!         .await?;
//!
//!     // Summarize the journal
//!     let entries = store.snapshot().await;
//!     let summary = generate_stats(&entries, chrono::Local::now().date_naive());
//!     println!("{} entries, trend: {}", summary.total_entries, summary.trend);
//!
//!     store.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod config;
pub mod export;
pub mod goals;
pub mod integrations;
pub mod search;
pub mod store;

// Re-export top-level types for convenience
pub use store::{
    EntryStore, FilterState, ImportMode, ImportOutcome, MoodEntry, MoodRating, StoreConfig,
    StoreError, StoreResult,
};

pub use analytics::{
    detect_anomalies, generate_stats, predict_mood, Anomaly, MoodStability, MoodTrend,
    PeriodComparison, Prediction, StatsSummary,
};

pub use search::{search, search_and_filter, SearchHistory, SearchOutcome};

pub use integrations::{ImportError, ImportReport, WebhookConfig, WebhookNotifier};

pub use goals::{Goal, GoalBook, GoalCondition, GoalProgress};

pub use config::{Config, ConfigError};
