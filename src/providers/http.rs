//! Shared HTTP plumbing for provider adapters.
//!
//! One [`HttpFetcher`] is built per provider family from [`FetchConfig`]:
//! a timeout-bounded `reqwest::Client` plus a GET-JSON helper that
//! classifies failures into the engine's [`Error::Fetch`] taxonomy and
//! retries transient ones with linear backoff.

use std::time::Duration;

use posterforged_common::{Error, Result};
use serde_json::Value;
use tracing::warn;

use crate::config::FetchConfig;

/// Timeout-bounded HTTP client with bounded retry for transient failures.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    retries: u32,
    backoff: Duration,
}

impl HttpFetcher {
    /// Build a fetcher from the fetch section of the config.
    pub fn new(config: &FetchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Mozilla/5.0")
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout: {e}");
                reqwest::Client::new()
            });

        Self {
            client,
            retries: config.retries,
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// Transport errors, HTTP 429 and 5xx responses are retried up to the
    /// configured count; other non-success statuses and unparseable bodies
    /// fail immediately. Everything surfaces as [`Error::Fetch`].
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        let mut attempt = 0u32;
        loop {
            match self.try_get_json(url).await {
                Ok(value) => return Ok(value),
                Err(Retryable::Yes(msg)) if attempt < self.retries => {
                    attempt += 1;
                    warn!(url = %url, attempt, "transient fetch failure, retrying: {msg}");
                    tokio::time::sleep(self.backoff * attempt).await;
                }
                Err(Retryable::Yes(msg)) | Err(Retryable::No(msg)) => {
                    return Err(Error::fetch(msg));
                }
            }
        }
    }

    async fn try_get_json(&self, url: &str) -> std::result::Result<Value, Retryable> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Retryable::Yes(format!("GET {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let msg = format!("GET {url}: HTTP {status}");
            return if status.is_server_error() || status.as_u16() == 429 {
                Err(Retryable::Yes(msg))
            } else {
                Err(Retryable::No(msg))
            };
        }

        resp.json::<Value>()
            .await
            .map_err(|e| Retryable::No(format!("GET {url}: invalid JSON: {e}")))
    }
}

enum Retryable {
    Yes(String),
    No(String),
}

/// Minimal percent-encoding for query parameter values.
pub fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";
