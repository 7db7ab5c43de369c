use std::env;
use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::extract::{ExtractOptions, ExtractProfile};
use crate::fetcher::{FetchSettings, DEFAULT_MAX_BYTES, DEFAULT_USER_AGENT};

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub bearer_token: String,
    pub request_limit: u32,
    pub reset_interval: Duration,
    pub fetch: FetchSettings,
    pub extract: ExtractOptions,
}

// Keeps the secret out of debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_addr", &self.server_addr)
            .field("bearer_token", &"<redacted>")
            .field("request_limit", &self.request_limit)
            .field("reset_interval", &self.reset_interval)
            .field("fetch", &self.fetch)
            .field("extract", &self.extract)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup, applying the same defaults and
    /// validation as [`Config::load`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Stored trimmed; `authorize` trims the presented token the same way.
        let bearer_token = lookup("BEARER_TOKEN")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::ConfigError("BEARER_TOKEN must be set".to_string()))?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;
        let port: u16 = parse_var(&lookup, "PORT", 8000)?;
        let server_addr = SocketAddr::new(ip, port);

        let request_limit: u32 = parse_var(&lookup, "REQUEST_LIMIT", 100)?;
        let reset_secs: u64 = parse_var(&lookup, "RESET_INTERVAL_SECS", 3600)?;
        let timeout_secs: u64 = parse_var(&lookup, "FETCH_TIMEOUT_SECS", 10)?;
        let max_bytes: u64 = parse_var(&lookup, "FETCH_MAX_BYTES", DEFAULT_MAX_BYTES)?;
        let profile: ExtractProfile = parse_var(&lookup, "EXTRACT_PROFILE", ExtractProfile::Full)?;

        for (name, value) in [
            ("REQUEST_LIMIT", u64::from(request_limit)),
            ("RESET_INTERVAL_SECS", reset_secs),
            ("FETCH_TIMEOUT_SECS", timeout_secs),
            ("FETCH_MAX_BYTES", max_bytes),
        ] {
            if value == 0 {
                return Err(AppError::ConfigError(format!("{} must be at least 1", name)));
            }
        }

        let fetch = FetchSettings {
            timeout: Duration::from_secs(timeout_secs),
            max_bytes,
            user_agent: lookup("FETCH_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            ..FetchSettings::default()
        };

        Ok(Config {
            server_addr,
            bearer_token,
            request_limit,
            reset_interval: Duration::from_secs(reset_secs),
            fetch,
            extract: profile.options(),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = Config::from_lookup(lookup_from(&[("BEARER_TOKEN", "secret123")])).unwrap();

        assert_eq!(config.bearer_token, "secret123");
        assert_eq!(config.server_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.request_limit, 100);
        assert_eq!(config.reset_interval, Duration::from_secs(3600));
        assert_eq!(config.fetch.timeout, Duration::from_secs(10));
        assert_eq!(config.fetch.user_agent, "LowEndAPI/1.0");
        assert_eq!(config.fetch.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.extract, ExtractOptions::full());
    }

    #[test]
    fn missing_token_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("BEARER_TOKEN"));

        let err = Config::from_lookup(lookup_from(&[("BEARER_TOKEN", "  ")])).unwrap_err();
        assert!(err.to_string().contains("BEARER_TOKEN"));
    }

    #[test]
    fn padded_token_is_stored_trimmed_and_still_authorizes() {
        let config = Config::from_lookup(lookup_from(&[("BEARER_TOKEN", " secret123 \n")])).unwrap();

        assert_eq!(config.bearer_token, "secret123");
        assert!(crate::auth::authorize(Some("Bearer secret123"), &config.bearer_token));
        assert!(crate::auth::authorize(Some("Bearer secret123 "), &config.bearer_token));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("BEARER_TOKEN", "t"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("REQUEST_LIMIT", "5"),
            ("RESET_INTERVAL_SECS", "60"),
            ("FETCH_TIMEOUT_SECS", "2"),
            ("FETCH_USER_AGENT", "TestAgent/2.0"),
            ("FETCH_MAX_BYTES", "4096"),
            ("EXTRACT_PROFILE", "lite"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.request_limit, 5);
        assert_eq!(config.reset_interval, Duration::from_secs(60));
        assert_eq!(config.fetch.timeout, Duration::from_secs(2));
        assert_eq!(config.fetch.user_agent, "TestAgent/2.0");
        assert_eq!(config.fetch.max_bytes, 4096);
        assert_eq!(config.extract, ExtractOptions::lite());
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = Config::from_lookup(lookup_from(&[("BEARER_TOKEN", "t"), ("PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = Config::from_lookup(lookup_from(&[("BEARER_TOKEN", "t"), ("REQUEST_LIMIT", "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("REQUEST_LIMIT"));

        let err = Config::from_lookup(lookup_from(&[("BEARER_TOKEN", "t"), ("EXTRACT_PROFILE", "max")]))
            .unwrap_err();
        assert!(err.to_string().contains("EXTRACT_PROFILE"));
    }

    #[test]
    fn debug_output_hides_token() {
        let config = Config::from_lookup(lookup_from(&[("BEARER_TOKEN", "hunter2")])).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
