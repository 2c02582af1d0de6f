// src/services/notifier.rs

//! Telegram notification delivery.
//!
//! Builds one MarkdownV2 message covering the full current listing set and
//! sends it through the Bot API. Delivery failures are returned to the
//! orchestrator, which logs them; they never abort a run.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::{Captures, Regex};
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{Config, Listing};

/// Delivery seam for new-listing notifications.
#[async_trait]
pub trait ListingNotifier: Send + Sync {
    /// Deliver a notification covering the full current listing set.
    async fn notify(&self, listings: &[Listing]) -> Result<()>;
}

/// Escape Telegram MarkdownV2 reserved characters with a leading backslash.
///
/// Idempotent: a reserved character already preceded by a backslash is left
/// alone, so escaping already-escaped text does not double-escape it.
pub fn escape_markdown(text: &str) -> String {
    static ESCAPE: OnceLock<Regex> = OnceLock::new();
    let re = ESCAPE.get_or_init(|| {
        Regex::new(r"\\?[_*\[\]()~`>#+\-=|{}.!]").expect("escape pattern is valid")
    });

    re.replace_all(text, |caps: &Captures| {
        let matched = &caps[0];
        if matched.starts_with('\\') {
            matched.to_string()
        } else {
            format!("\\{matched}")
        }
    })
    .into_owned()
}

/// Build the MarkdownV2 message body for the current listing set.
///
/// The message covers the full set, not just the new entries, and leads
/// with the total count.
pub fn build_message(listings: &[Listing]) -> String {
    let mut message = format!(
        "📢 *New Crous Listings Found:* {} available\n\n",
        listings.len()
    );

    for listing in listings {
        message.push_str(&format!(
            "🏡 *{}*\n📍 {}\n💰 {}\n🔗 [View Crous]({})\n\n",
            escape_markdown(&listing.title),
            escape_markdown(&listing.location),
            escape_markdown(&listing.price),
            escape_markdown(&listing.link),
        ));
    }

    message
}

/// Outgoing `sendMessage` payload.
#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

/// Sends notifications through the Telegram Bot API.
pub struct TelegramNotifier {
    client: Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier bound to the configured bot and chat.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "https://api.telegram.org/bot{}/sendMessage",
                config.telegram.bot_token
            ),
            chat_id: config.telegram.chat_id.clone(),
        })
    }

    /// One `sendMessage` call, link preview disabled.
    async fn send(&self, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "MarkdownV2",
            disable_web_page_preview: true,
        };

        self.client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::notify(e))?
            .error_for_status()
            .map_err(|e| AppError::notify(e))?;

        Ok(())
    }
}

#[async_trait]
impl ListingNotifier for TelegramNotifier {
    async fn notify(&self, listings: &[Listing]) -> Result<()> {
        self.send(&build_message(listings)).await
    }
}
