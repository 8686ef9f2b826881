use anyhow::{Context, Result};

/// Application configuration loaded from environment variables (and `.env`)
/// once at process start. Read-only thereafter; nothing mutates it at runtime.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key, trimmed. May be empty: the analyze action reports an
    /// actionable configuration error instead of the process refusing to boot.
    pub openai_api_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .unwrap_or_default()
                .trim()
                .to_string(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
