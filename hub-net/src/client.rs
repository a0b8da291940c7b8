//! HTTP client for search providers
//!
//! One `reqwest` client per adapter, with a rotating desktop user agent,
//! a per-request timeout and simple retries on transport errors and
//! 5xx/429 responses.

use reqwest::{Client, Proxy, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base delay between retries, multiplied by the attempt number
    pub retry_backoff_ms: u64,
    /// Optional proxy URL (http, https or socks5h)
    pub proxy: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_retries: 2,
            retry_backoff_ms: 250,
            proxy: None,
        }
    }
}

impl HttpConfig {
    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(attempt as u64))
    }
}

/// Errors from provider requests
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned status {0}")]
    Status(u16),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Max retries ({0}) exceeded")]
    MaxRetries(u32),
}

/// User agents for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:137.0) Gecko/20100101 Firefox/137.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.7; rv:137.0) Gecko/20100101 Firefox/137.0",
];

/// Get a random user agent
pub fn random_user_agent() -> &'static str {
    use rand::Rng;
    let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
    USER_AGENTS[idx]
}

/// Whether a response status is worth retrying
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Create a configured `reqwest` client
pub fn create_client(config: &HttpConfig) -> Result<Client, FetchError> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(random_user_agent());

    if let Some(proxy) = &config.proxy {
        let proxy = Proxy::all(proxy).map_err(|e| FetchError::ClientBuild(e.to_string()))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| FetchError::ClientBuild(e.to_string()))
}

/// HTTP client with retry policy
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
}

impl HttpClient {
    pub fn new(config: HttpConfig) -> Result<Self, FetchError> {
        let client = create_client(&config)?;
        Ok(Self { client, config })
    }

    /// GET a URL and return the body as text
    pub async fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, FetchError> {
        let mut attempt = 0;

        loop {
            let mut request = self.client.get(url);
            for (name, value) in headers {
                request = request.header(*name, *value);
            }

            let retry_reason = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.text().await.map_err(FetchError::from);
                    }
                    if !is_retryable_status(status) {
                        warn!("{} returned status: {}", url, status);
                        return Err(FetchError::Status(status.as_u16()));
                    }
                    format!("status {}", status)
                }
                Err(e) if e.is_timeout() => {
                    if attempt >= self.config.max_retries {
                        return Err(FetchError::Timeout(self.config.timeout_secs));
                    }
                    "timeout".to_string()
                }
                Err(e) if e.is_connect() || e.is_request() => {
                    if attempt >= self.config.max_retries {
                        return Err(e.into());
                    }
                    e.to_string()
                }
                Err(e) => return Err(e.into()),
            };

            if attempt >= self.config.max_retries {
                return Err(FetchError::MaxRetries(self.config.max_retries));
            }

            attempt += 1;
            debug!(
                "Retrying {} ({}/{}) after {}",
                url, attempt, self.config.max_retries, retry_reason
            );
            tokio::time::sleep(self.config.backoff(attempt)).await;
        }
    }

    /// Whether a URL answers at all (any status below 500)
    pub async fn probe(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(resp) => !resp.status().is_server_error(),
            Err(_) => false,
        }
    }
}
