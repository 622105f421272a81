//! Stored file model for storage and API.

use crate::models::CsvPreview;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// One uploaded file, as recovered from its object key.
///
/// Keys have the layout `{prefix}{id}/{filename}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FileRecord {
    /// Upload id (UUID v4)
    pub id: String,
    /// Sanitized filename
    pub filename: String,
    /// Full object key
    pub key: String,
    /// Size in bytes
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub size: u64,
    pub content_type: Option<String>,
    /// Upload time (RFC 3339), when the store reports one
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl FileRecord {
    /// Object key for an upload.
    pub fn object_key(prefix: &str, id: &Uuid, filename: &str) -> String {
        format!("{prefix}{id}/{filename}")
    }

    /// Rebuild a record from an object key.
    ///
    /// Returns `None` for keys outside `prefix` or not shaped like an upload.
    pub fn from_key(
        prefix: &str,
        key: &str,
        size: u64,
        content_type: Option<String>,
        uploaded_at: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        let rest = key.strip_prefix(prefix)?;
        let (id, filename) = rest.split_once('/')?;
        if filename.is_empty() || filename.contains('/') {
            return None;
        }
        let id = Uuid::parse_str(id).ok()?;

        Some(Self {
            id: id.to_string(),
            filename: filename.to_string(),
            key: key.to_string(),
            size,
            content_type,
            uploaded_at,
        })
    }

    /// Whether the file should be treated as CSV.
    pub fn is_csv(&self) -> bool {
        crate::services::filename::extension(&self.filename).as_deref() == Some("csv")
    }
}

/// Listing response.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FileList {
    pub files: Vec<FileRecord>,
    pub count: usize,
}

impl From<Vec<FileRecord>> for FileList {
    fn from(files: Vec<FileRecord>) -> Self {
        Self {
            count: files.len(),
            files,
        }
    }
}

/// Response for a successful upload.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UploadResponse {
    #[serde(flatten)]
    pub file: FileRecord,
    /// Present for CSV uploads
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub preview: Option<CsvPreview>,
}
