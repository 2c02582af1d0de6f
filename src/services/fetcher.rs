// src/services/fetcher.rs

//! Search page fetching.

use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Fetches the watched page over HTTP.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Create a fetcher with a configured HTTP client.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    /// Perform a single GET and return the decoded response body.
    ///
    /// Network failure, timeout, and non-2xx status all map to a fetch
    /// error; the caller must not touch the snapshot in that case. The body
    /// is decoded per the server-declared charset, defaulting to UTF-8.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e))?
            .error_for_status()
            .map_err(|e| AppError::fetch(url, e))?;

        response.text().await.map_err(|e| AppError::fetch(url, e))
    }
}
