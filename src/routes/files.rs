// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File upload, listing and download routes.

use crate::error::{AppError, Result};
use crate::models::{CsvPreview, FileList, FileRecord, UploadResponse};
use crate::services::csv_preview::records_to_csv;
use crate::services::files::{build_preview, MAX_PREVIEW_ROWS};
use crate::services::FileService;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::QueryRejection,
        DefaultBodyLimit, Multipart, Path, Query, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const UPLOAD_FIELD: &str = "file";
const OCTET_STREAM: &str = "application/octet-stream";

/// File routes. `max_upload_bytes` caps request bodies on the upload route.
pub fn routes(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/files",
            get(list_files)
                .post(upload_file)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/files/export.csv", get(export_csv))
        .route("/api/files/{id}", get(download_file).delete(delete_file))
        .route("/api/files/{id}/meta", get(get_file_meta))
        .route("/api/files/{id}/preview", get(preview_file))
}

// ─── Upload ──────────────────────────────────────────────────

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

/// Accept a multipart upload with the file in the `file` field.
async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Upload has no filename".to_string()))?;
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        let record = state
            .files
            .upload(&original_name, content_type.as_deref(), data.clone())
            .await?;

        let preview = if record.is_csv() {
            csv_preview_on_upload(&record, &data, state.config.csv_preview_rows)
        } else {
            None
        };

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                file: record,
                preview,
            }),
        ));
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

/// The upload is already stored, so a bad CSV only costs the preview.
fn csv_preview_on_upload(record: &FileRecord, data: &Bytes, rows: usize) -> Option<CsvPreview> {
    match build_preview(record, data, rows) {
        Ok(preview) => Some(preview),
        Err(err) => {
            tracing::warn!(id = %record.id, error = %err, "CSV upload could not be previewed");
            None
        }
    }
}

// ─── Listing ─────────────────────────────────────────────────

async fn list_files(State(state): State<Arc<AppState>>) -> Result<Json<FileList>> {
    Ok(Json(state.files.list().await?.into()))
}

/// Listing as a CSV attachment.
async fn export_csv(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let records = state.files.list().await?;
    let body = records_to_csv(&records)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"files.csv\""),
    );
    Ok((headers, body))
}

// ─── Single file ─────────────────────────────────────────────

async fn get_file_meta(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FileRecord>> {
    let id = FileService::parse_id(&id)?;
    let record = state
        .files
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File {id} not found")))?;
    Ok(Json(record))
}

fn attachment_disposition(filename: &str) -> HeaderValue {
    // Sanitized names are ASCII without quotes, but stay strict anyway.
    HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = FileService::parse_id(&id)?;
    let (record, data) = state.files.download(&id).await?;

    let content_type = record
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static(OCTET_STREAM));

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(
        header::CONTENT_DISPOSITION,
        attachment_disposition(&record.filename),
    );
    Ok((headers, data))
}

async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = FileService::parse_id(&id)?;
    state.files.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Preview ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct PreviewQuery {
    /// Rows to return; defaults to the configured preview size
    rows: Option<usize>,
}

async fn preview_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: std::result::Result<Query<PreviewQuery>, QueryRejection>,
) -> Result<Json<CsvPreview>> {
    let id = FileService::parse_id(&id)?;
    let Query(query) = query?;
    let rows = query.rows.unwrap_or(state.config.csv_preview_rows);
    if rows == 0 || rows > MAX_PREVIEW_ROWS {
        return Err(AppError::BadRequest(format!(
            "rows must be between 1 and {MAX_PREVIEW_ROWS}"
        )));
    }

    Ok(Json(state.files.preview(&id, rows).await?))
}
