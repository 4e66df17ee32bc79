//! Environment-driven configuration for PdfStamp API

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_MAX_BODY_SIZE: usize = 50 * 1024 * 1024;
const DEFAULT_UPLOAD_DIR: &str = "./uploads";
const DEFAULT_FLATTEN_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub frontend_origin: String,
    pub max_body_size: usize,
    pub upload_dir: PathBuf,
    /// Upper bound on one parse/render/serialize pass, so malformed input
    /// cannot pin a blocking worker indefinitely.
    pub flatten_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("invalid PORT value: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let frontend_origin = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGIN.to_string());

        let max_body_size = match std::env::var("MAX_BODY_SIZE") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("invalid MAX_BODY_SIZE value: {raw}"))?,
            Err(_) => DEFAULT_MAX_BODY_SIZE,
        };

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let flatten_timeout = match std::env::var("FLATTEN_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("invalid FLATTEN_TIMEOUT_SECS value: {raw}"))?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_FLATTEN_TIMEOUT_SECS),
        };

        Ok(Config {
            port,
            frontend_origin,
            max_body_size,
            upload_dir,
            flatten_timeout,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            frontend_origin: DEFAULT_FRONTEND_ORIGIN.to_string(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            flatten_timeout: Duration::from_secs(DEFAULT_FLATTEN_TIMEOUT_SECS),
        }
    }
}
