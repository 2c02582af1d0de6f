//! Application configuration structures.
//!
//! Configuration is read from the process environment exactly once, at
//! startup, and passed by reference into each component.

use std::env;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot credentials and destination
    pub telegram: TelegramConfig,

    /// Watch target settings
    pub watch: WatchConfig,

    /// HTTP client behavior settings
    pub http: HttpConfig,
}

/// Telegram bot credentials and destination channel.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: String,

    /// Destination chat identifier
    pub chat_id: String,
}

/// Watch target settings.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Search results page to watch
    pub search_url: String,
}

/// HTTP client behavior settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Config {
    /// Build and validate configuration from the process environment.
    ///
    /// `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`, and `CROUS_URL` are
    /// required; `CROUS_USER_AGENT` and `CROUS_TIMEOUT_SECS` override the
    /// defaults.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            telegram: TelegramConfig {
                bot_token: require_env("TELEGRAM_BOT_TOKEN")?,
                chat_id: require_env("TELEGRAM_CHAT_ID")?,
            },
            watch: WatchConfig {
                search_url: require_env("CROUS_URL")?,
            },
            http: HttpConfig {
                user_agent: env::var("CROUS_USER_AGENT")
                    .unwrap_or_else(|_| defaults::user_agent()),
                timeout_secs: match env::var("CROUS_TIMEOUT_SECS") {
                    Ok(raw) => raw.parse().map_err(|_| {
                        AppError::config(format!("CROUS_TIMEOUT_SECS is not a number: {raw}"))
                    })?,
                    Err(_) => defaults::timeout(),
                },
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(AppError::config("TELEGRAM_BOT_TOKEN is empty"));
        }
        if self.telegram.chat_id.trim().is_empty() {
            return Err(AppError::config("TELEGRAM_CHAT_ID is empty"));
        }
        if url::Url::parse(&self.watch.search_url).is_err() {
            return Err(AppError::config(format!(
                "CROUS_URL is not a valid URL: {}",
                self.watch.search_url
            )));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::config("CROUS_USER_AGENT is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::config("CROUS_TIMEOUT_SECS must be > 0"));
        }
        Ok(())
    }
}

/// Read a required environment variable.
fn require_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| AppError::config(format!("{key} is not set")))
}

mod defaults {
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; crous-watch/0.1)".into()
    }

    pub fn timeout() -> u64 {
        10
    }
}
