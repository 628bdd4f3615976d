use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_SERVICE_URL: &str = "http://localhost:5001";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub tailoring_api_url: String,
    pub export_api_url: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            host: env_or("HOST", "127.0.0.1"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            data_dir: PathBuf::from(env_or("DATA_DIR", "./data")),
            tailoring_api_url: env_or("TAILORING_API_URL", DEFAULT_SERVICE_URL),
            export_api_url: env_or("EXPORT_API_URL", DEFAULT_SERVICE_URL),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
