use std::str::FromStr;

use anyhow::{Context, Result};

use crate::scoring::reconciler::LegacyWeights;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a numeric one is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the recruitment backend (e.g. `https://backend.example.com/api`).
    pub backend_url: String,
    pub backend_token: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Default radar square size in pixels.
    pub radar_size: u32,
    pub comparison_max_candidates: usize,
    pub legacy_weights: LegacyWeights,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = LegacyWeights::default();

        Ok(Config {
            backend_url: require_env("BACKEND_URL")?
                .trim_end_matches('/')
                .to_string(),
            backend_token: std::env::var("BACKEND_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            radar_size: parse_env("RADAR_SIZE", 300)?,
            comparison_max_candidates: parse_env("COMPARISON_MAX_CANDIDATES", 3)?,
            legacy_weights: LegacyWeights {
                experience_per_entry: parse_env(
                    "LEGACY_EXPERIENCE_WEIGHT",
                    defaults.experience_per_entry,
                )?,
                education_per_entry: parse_env(
                    "LEGACY_EDUCATION_WEIGHT",
                    defaults.education_per_entry,
                )?,
                appreciation_scale: parse_env(
                    "LEGACY_APPRECIATION_SCALE",
                    defaults.appreciation_scale,
                )?,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number (got '{raw}')")),
        Err(_) => Ok(default),
    }
}
