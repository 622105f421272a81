// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV parsing for upload previews and the listing export.

use crate::error::AppError;
use crate::models::FileRecord;
use csv::{ReaderBuilder, Trim, WriterBuilder};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parsed head of a CSV document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: u64,
}

impl ParsedCsv {
    pub fn truncated(&self) -> bool {
        self.total_rows > self.rows.len() as u64
    }
}

/// Parse `data` as CSV, keeping the header and at most `max_rows` rows.
///
/// Every row is still read so `total_rows` is exact and malformed input
/// anywhere in the file is rejected.
pub fn preview_csv(data: &[u8], max_rows: usize) -> Result<ParsedCsv, AppError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| AppError::BadRequest(format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::with_capacity(max_rows.min(1024));
    let mut total_rows = 0u64;
    for result in reader.records() {
        let record = result.map_err(|e| {
            AppError::BadRequest(format!("Failed to parse CSV row {}: {e}", total_rows + 1))
        })?;
        if rows.len() < max_rows {
            rows.push(record.iter().map(str::to_string).collect());
        }
        total_rows += 1;
    }

    Ok(ParsedCsv {
        headers,
        rows,
        total_rows,
    })
}

/// Render the file listing as CSV.
pub fn records_to_csv(records: &[FileRecord]) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record([
            "id",
            "filename",
            "key",
            "size",
            "content_type",
            "uploaded_at",
        ])
        .map_err(|e| anyhow::anyhow!("CSV write failed: {e}"))?;

    for record in records {
        let size = record.size.to_string();
        let uploaded_at = record
            .uploaded_at
            .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
            .unwrap_or_default();
        writer
            .write_record([
                record.id.as_str(),
                record.filename.as_str(),
                record.key.as_str(),
                size.as_str(),
                record.content_type.as_deref().unwrap_or(""),
                uploaded_at.as_str(),
            ])
            .map_err(|e| anyhow::anyhow!("CSV write failed: {e}"))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("CSV flush failed: {e}"))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.into()))
}
