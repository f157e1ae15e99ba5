//! Telegram Bot API client (sendMessage only)

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::core::TelegramConfig;

const API_BASE: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        Self::with_base_url(config, API_BASE)
    }

    /// Point the client at another API host
    pub fn with_base_url(config: &TelegramConfig, base_url: &str) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                base_url.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id.clone(),
        })
    }

    async fn send_once(&self, text: &str) -> Result<(), TelegramError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(TelegramError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    /// Send with up to three attempts and exponential backoff
    pub async fn send(&self, text: &str) -> Result<(), TelegramError> {
        let mut attempt = 1;
        loop {
            match self.send_once(text).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < MAX_ATTEMPTS => {
                    let delay = retry_delay(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Telegram send failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn retry_delay(attempt: u32) -> Duration {
    Duration::from_millis(RETRY_BASE_DELAY_MS * 2u64.pow(attempt - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_doubles() {
        assert_eq!(retry_delay(1), Duration::from_millis(500));
        assert_eq!(retry_delay(2), Duration::from_millis(1000));
    }

    #[test]
    fn test_endpoint_includes_token() {
        let config = TelegramConfig {
            bot_token: "123:abc".into(),
            chat_id: "-100".into(),
        };
        let client = TelegramClient::with_base_url(&config, "http://localhost:9/").unwrap();
        assert_eq!(client.endpoint, "http://localhost:9/bot123:abc/sendMessage");
    }
}
