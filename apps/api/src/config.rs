use std::str::FromStr;

use anyhow::{Context, Result};

const PLACEHOLDER_API_KEY: &str = "your_gemini_api_key_here";

/// Application configuration loaded from environment variables.
/// Fails at startup if a numeric variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` disables AI scoring; search falls back to the keyword scorer.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub candidates_file: String,
    pub max_concurrent_ai_calls: usize,
    pub ai_call_timeout_secs: u64,
    pub search_max_results: usize,
    pub search_min_score: u8,
    pub hard_filter_location: bool,
    pub hard_filter_seniority: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY")
                .filter(|key| key != PLACEHOLDER_API_KEY),
            gemini_model: env_or("GEMINI_MODEL", "gemini-1.5-flash"),
            gemini_api_base: env_or(
                "GEMINI_API_BASE",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            candidates_file: env_or("CANDIDATES_FILE", "data/candidates.json"),
            max_concurrent_ai_calls: parse_env("MAX_CONCURRENT_AI_CALLS", 5)?,
            ai_call_timeout_secs: parse_env("AI_CALL_TIMEOUT_SECS", 30)?,
            search_max_results: parse_env("SEARCH_MAX_RESULTS", 20)?,
            search_min_score: parse_env("SEARCH_MIN_SCORE", 0)?,
            hard_filter_location: parse_env("HARD_FILTER_LOCATION", false)?,
            hard_filter_seniority: parse_env("HARD_FILTER_SENIORITY", false)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn ai_enabled(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration used by handler and pipeline tests; never reads the environment.
    pub fn for_tests(candidates_file: &str) -> Self {
        Config {
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_api_base: "http://127.0.0.1:9".to_string(),
            candidates_file: candidates_file.to_string(),
            max_concurrent_ai_calls: 4,
            ai_call_timeout_secs: 5,
            search_max_results: 20,
            search_min_score: 0,
            hard_filter_location: false,
            hard_filter_seniority: false,
            port: 0,
            rust_log: "info".to_string(),
        }
    }
}
