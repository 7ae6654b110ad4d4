use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Which after-rewrite projection backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Rescore,
    Randomized,
}

impl std::str::FromStr for ProjectionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rescore" => Ok(ProjectionMode::Rescore),
            "randomized" => Ok(ProjectionMode::Randomized),
            other => bail!("unknown projection mode '{other}' (expected rescore | randomized)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Texts shorter than this (in characters) are rejected before any stage runs.
    pub min_input_chars: usize,
    pub max_upload_bytes: usize,
    pub llm_timeout: Duration,
    pub score_projection: ProjectionMode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            min_input_chars: env_or("MIN_INPUT_CHARS", "50")
                .parse()
                .context("MIN_INPUT_CHARS must be a non-negative integer")?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", "10485760")
                .parse()
                .context("MAX_UPLOAD_BYTES must be a non-negative integer")?,
            llm_timeout: Duration::from_secs(
                env_or("LLM_TIMEOUT_SECS", "120")
                    .parse()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            score_projection: env_or("SCORE_PROJECTION", "rescore")
                .parse()
                .context("SCORE_PROJECTION is invalid")?,
        })
    }

    #[cfg(test)]
    pub fn test_default() -> Self {
        Config {
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            min_input_chars: 50,
            max_upload_bytes: 10 * 1024 * 1024,
            llm_timeout: Duration::from_secs(5),
            score_projection: ProjectionMode::Rescore,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
