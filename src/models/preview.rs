//! CSV preview model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// First rows of an uploaded CSV file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CsvPreview {
    pub id: String,
    pub filename: String,
    /// Column names from the first record
    pub headers: Vec<String>,
    /// Data rows, at most the requested count
    pub rows: Vec<Vec<String>>,
    /// Data rows in the whole file
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_rows: u64,
    /// True when `rows` holds fewer than `total_rows`
    pub truncated: bool,
}
