use std::time::Duration;

use anyhow::{Context, Result};

use crate::autosave::DEFAULT_DEBOUNCE;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Document-generation endpoint that turns a résumé into a PDF.
    pub generator_url: String,
    pub generator_timeout: Duration,
    /// Directory holding the persisted draft.
    pub storage_dir: String,
    /// Key the draft is stored under.
    pub storage_key: String,
    pub autosave_debounce: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            generator_url: require_env("GENERATOR_URL")?,
            generator_timeout: Duration::from_secs(parse_env("GENERATOR_TIMEOUT_SECS", 60)?),
            storage_dir: std::env::var("STORAGE_DIR").unwrap_or_else(|_| "./data".to_string()),
            storage_key: std::env::var("STORAGE_KEY").unwrap_or_else(|_| "resumeData".to_string()),
            autosave_debounce: Duration::from_millis(parse_env(
                "AUTOSAVE_DEBOUNCE_MS",
                DEFAULT_DEBOUNCE.as_millis() as u64,
            )?),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
