//! External interfaces
//!
//! This module provides the data paths in and out of the journal:
//! - CSV import (required `date`/`mood` columns, lenient per row)
//! - JSON import (array of entries, ids preserved)
//! - Outbound webhook notifications (signed, fire-and-forget)

mod csv_import;
mod json_import;
pub mod webhook;

pub use csv_import::{import_csv_path, import_csv_str};
pub use json_import::import_json_str;
pub use webhook::{WebhookConfig, WebhookNotifier, WebhookPayload};

use crate::store::types::MoodEntry;

/// Result of parsing an import payload
///
/// Format-level problems (missing columns, non-array JSON) fail before any
/// entry is produced; row-level problems (bad date, mood out of range) skip
/// the row and keep going.
#[derive(Debug)]
pub struct ImportReport {
    /// Entries that passed validation, in input order
    pub entries: Vec<MoodEntry>,
    /// Rows/elements dropped by per-row validation
    pub rows_skipped: usize,
    /// Human-readable per-row error descriptions
    pub errors: Vec<String>,
}

/// Errors that can occur while parsing import payloads
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("JSON import payload must be an array of entries")]
    NotAnArray,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
