pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod quota;

use std::sync::Arc;
use config::Config;
use error::Result;
use extract::Extractor;
use fetcher::Fetcher;
use quota::QuotaGate;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub quota: Arc<QuotaGate>,
    pub fetcher: Fetcher,
    pub extractor: Arc<Extractor>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let quota = QuotaGate::new(config.request_limit, config.reset_interval);
        let fetcher = Fetcher::new(&config.fetch)?;
        let extractor = Extractor::new(config.extract.clone());

        Ok(Self {
            config: Arc::new(config),
            quota: Arc::new(quota),
            fetcher,
            extractor: Arc::new(extractor),
        })
    }
}
