//! Moodlog Entry Store
//!
//! This module provides the persisted mood-entry collection:
//!
//! - **types**: Core data structures (MoodEntry, MoodRating, FilterState)
//! - **codec**: Optional XOR+base64 obfuscation of the persisted payload
//! - **engine**: The entry store (load once, save whole collection per mutation)
//! - **sync**: Background reconciliation with external writers
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   mutation → in-memory Vec<MoodEntry> → serialize ALL → (obfuscate) → file
//!
//! Read Path:
//!   snapshot() → sorted Vec<MoodEntry> → analytics / search / export
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use moodlog::store::{EntryStore, StoreConfig, MoodEntry, MoodRating};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = EntryStore::open(StoreConfig::new("./data")).await?;
//!
//!     let rating = MoodRating::new(4).expect("valid mood");
//!     store.add(MoodEntry::new(rating).note("Sunny walk").tags(["outdoors"])).await?;
//!
//!     let entries = store.snapshot().await;
//!     println!("{} entries", entries.len());
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod engine;
pub mod error;
pub mod sync;
pub mod types;

// Re-export commonly used types
pub use engine::{EntryStore, ImportMode, ImportOutcome, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use sync::start_background_sync;
pub use types::{normalize_tags, Attachment, FilterState, MoodEntry, MoodRating};
