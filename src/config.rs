// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use crate::services::files::MAX_PREVIEW_ROWS;
use std::env;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_PREFIX: &str = "uploads/";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Which object store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    /// In-process store; contents are lost on restart.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    pub storage_backend: StorageBackend,

    // --- S3 ---
    /// Bucket holding uploads (empty for the memory backend)
    pub s3_bucket: String,
    pub aws_region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack)
    pub s3_endpoint: Option<String>,
    pub s3_force_path_style: bool,

    // --- Uploads ---
    /// Key prefix for uploads, always ends with `/`
    pub upload_prefix: String,
    /// Request body limit in bytes
    pub max_upload_bytes: usize,
    /// Lowercase extensions accepted for upload; empty accepts anything
    pub allowed_extensions: Vec<String>,
    /// Rows returned by a CSV preview when the caller doesn't ask
    pub csv_preview_rows: usize,
}

impl Config {
    /// Config for tests: memory backend, default limits.
    pub fn test_default() -> Self {
        Self {
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            storage_backend: StorageBackend::Memory,
            s3_bucket: String::new(),
            aws_region: DEFAULT_REGION.to_string(),
            s3_endpoint: None,
            s3_force_path_style: false,
            upload_prefix: DEFAULT_PREFIX.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: Vec::new(),
            csv_preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "s3" => StorageBackend::S3,
            "memory" => StorageBackend::Memory,
            _ => return Err(ConfigError::Invalid("STORAGE_BACKEND")),
        };

        let s3_bucket = match (storage_backend, env::var("S3_BUCKET")) {
            (_, Ok(bucket)) if !bucket.trim().is_empty() => bucket.trim().to_string(),
            (StorageBackend::S3, _) => return Err(ConfigError::Missing("S3_BUCKET")),
            (StorageBackend::Memory, _) => String::new(),
        };

        Ok(Self {
            port: parse_var("PORT", DEFAULT_PORT)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            storage_backend,
            s3_bucket,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|v| !v.is_empty()),
            s3_force_path_style: parse_var("S3_FORCE_PATH_STYLE", false)?,
            upload_prefix: normalize_prefix(
                &env::var("UPLOAD_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
            ),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            allowed_extensions: env::var("ALLOWED_EXTENSIONS")
                .map(|v| parse_extensions(&v))
                .unwrap_or_default(),
            csv_preview_rows: parse_preview_rows()?,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Default preview size; must itself be a row count callers may request.
fn parse_preview_rows() -> Result<usize, ConfigError> {
    let rows = parse_var("CSV_PREVIEW_ROWS", DEFAULT_PREVIEW_ROWS)?;
    if (1..=MAX_PREVIEW_ROWS).contains(&rows) {
        Ok(rows)
    } else {
        Err(ConfigError::Invalid("CSV_PREVIEW_ROWS"))
    }
}

/// Strip leading slashes and make sure a non-empty prefix ends in `/`.
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('/');
    if trimmed.is_empty() || trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("uploads"), "uploads/");
        assert_eq!(normalize_prefix("/uploads/"), "uploads/");
        assert_eq!(normalize_prefix("a/b"), "a/b/");
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
    }

    #[test]
    fn test_parse_extensions() {
        assert_eq!(parse_extensions("csv, .TXT,,png"), vec!["csv", "txt", "png"]);
        assert!(parse_extensions(" , ").is_empty());
    }

    // Env vars are process-global, so every env-driven case lives in one test.
    #[test]
    fn test_config_from_env() {
        env::set_var("STORAGE_BACKEND", "s3");
        env::remove_var("S3_BUCKET");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Missing("S3_BUCKET"))
        ));

        env::set_var("S3_BUCKET", "test-bucket");
        env::set_var("UPLOAD_PREFIX", "files");
        env::set_var("ALLOWED_EXTENSIONS", "csv,txt");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.s3_bucket, "test-bucket");
        assert_eq!(config.upload_prefix, "files/");
        assert_eq!(config.allowed_extensions, vec!["csv", "txt"]);
        assert_eq!(config.storage_backend, StorageBackend::S3);

        env::set_var("MAX_UPLOAD_BYTES", "lots");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("MAX_UPLOAD_BYTES"))
        ));

        env::remove_var("MAX_UPLOAD_BYTES");

        for rows in ["0", "501"] {
            env::set_var("CSV_PREVIEW_ROWS", rows);
            assert!(matches!(
                Config::from_env(),
                Err(ConfigError::Invalid("CSV_PREVIEW_ROWS"))
            ));
        }
        env::set_var("CSV_PREVIEW_ROWS", "500");
        assert_eq!(Config::from_env().unwrap().csv_preview_rows, 500);
        env::remove_var("CSV_PREVIEW_ROWS");

        env::remove_var("S3_BUCKET");
        env::set_var("STORAGE_BACKEND", "memory");
        let config = Config::from_env().expect("memory backend needs no bucket");
        assert_eq!(config.storage_backend, StorageBackend::Memory);

        env::remove_var("STORAGE_BACKEND");
        env::remove_var("UPLOAD_PREFIX");
        env::remove_var("ALLOWED_EXTENSIONS");
    }
}
