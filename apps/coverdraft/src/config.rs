use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::backend_client::DEFAULT_BASE_URL;
use crate::layout::FontFamily;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the cover-letter backend, e.g. `http://localhost:5001/api`.
    pub backend_api_url: String,
    pub port: u16,
    pub rust_log: String,
    pub request_timeout_secs: u64,
    /// How long the copy/export banners stay raised.
    pub notification_ttl_ms: u64,
    pub export_dir: PathBuf,
    /// Font whose metrics drive line wrapping in exported documents.
    pub export_font: FontFamily,
    /// Shell-style command line that receives copied text on stdin (e.g. `xclip -selection clipboard`).
    /// When unset, copied text is held in memory and served by the clipboard endpoint.
    pub clipboard_command: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_api_url: std::env::var("BACKEND_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 120)?,
            notification_ttl_ms: parse_env("NOTIFICATION_TTL_MS", 2000)?,
            export_dir: std::env::var("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("exports")),
            export_font: parse_env("EXPORT_FONT", FontFamily::Inter)?,
            clipboard_command: std::env::var("CLIPBOARD_COMMAND")
                .ok()
                .filter(|cmd| !cmd.trim().is_empty()),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
