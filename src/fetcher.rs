use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::error::{AppError, Result};

pub const DEFAULT_USER_AGENT: &str = "LowEndAPI/1.0";
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Upstream responded with HTTP {0}")]
    Status(u16),

    #[error("Timed out fetching website: {0}")]
    Timeout(String),

    #[error("Error fetching website: {0}")]
    Transport(String),

    #[error("Response body exceeds {0} bytes")]
    TooLarge(u64),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Single-attempt page fetcher. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_bytes: u64,
}

impl Fetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.as_str())
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_bytes: settings.max_bytes,
        })
    }

    /// GET `url` and return its body. Anything other than 200 is an error,
    /// as is a body larger than `max_bytes`.
    pub async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(%url, status = status.as_u16(), "upstream returned non-200");
            return Err(FetchError::Status(status.as_u16()));
        }

        if response
            .content_length()
            .is_some_and(|declared| declared > self.max_bytes)
        {
            return Err(FetchError::TooLarge(self.max_bytes));
        }

        // Content-Length may be absent or wrong, so the cap is enforced while reading.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(FetchError::TooLarge(self.max_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        let html = String::from_utf8_lossy(&body).into_owned();
        debug!(%url, bytes = html.len(), "fetched page");
        Ok(html)
    }
}
