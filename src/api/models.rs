use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::extract::ScrapeResult;

#[derive(Debug, Deserialize)]
pub struct ScrapeQuery {
    pub url: Option<String>,
}

impl ScrapeQuery {
    /// The target URL, treating an empty value as absent.
    pub fn target(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub status: &'static str,
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: ScrapeResult,
}

impl ScrapeResponse {
    pub fn new(url: &str, result: ScrapeResult) -> Self {
        Self {
            status: "success",
            url: url.to_string(),
            scraped_at: Utc::now(),
            result,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub current_request_count: u32,
    pub request_limit: u32,
    /// Seconds until the quota window resets.
    pub remaining_time_to_reset: f64,
}
