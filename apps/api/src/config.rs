use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://triguard.db";
/// `DATABASE_URL` value that keeps projects in process memory only.
pub const IN_MEMORY_DATABASE: &str = "memory";
const DEFAULT_REPORT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_CHAT_MODEL: &str = "gemini-3-pro-preview";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub report_model: String,
    pub chat_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            report_model: env_or("REPORT_MODEL", DEFAULT_REPORT_MODEL),
            chat_model: env_or("CHAT_MODEL", DEFAULT_CHAT_MODEL),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
