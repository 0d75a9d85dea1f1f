use crate::error::{Error, Result};
use crate::limiter::DEFAULT_MIN_INTERVAL_MS;
use std::env;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://hacker-news.firebaseio.com";

/// Runtime configuration for [`crate::HnClient`].
/// Values are sourced from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL, always ending in `/` so endpoint paths join under it.
    pub api_url: Url,
    pub min_interval_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: parse_base_url(DEFAULT_API_URL).expect("default API URL is valid"),
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            timeout_secs: 30,
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - HN_API_URL (default: https://hacker-news.firebaseio.com)
    /// - HN_MIN_INTERVAL_MS (default: 250)
    /// - HN_HTTP_TIMEOUT_SECS (default: 30)
    /// - HN_USER_AGENT (default: hn-client/<version>)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same resolution as [`Config::from_env`] against an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let api_url = var("HN_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let api_url = parse_base_url(&api_url)?;
        let min_interval_ms = var("HN_MIN_INTERVAL_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_MIN_INTERVAL_MS);
        let timeout_secs = var("HN_HTTP_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(30);
        let user_agent = var("HN_USER_AGENT").unwrap_or_else(default_user_agent);

        Ok(Self {
            api_url,
            min_interval_ms,
            timeout_secs,
            user_agent,
        })
    }

    pub fn with_api_url(mut self, url: &str) -> Result<Self> {
        self.api_url = parse_base_url(url)?;
        Ok(self)
    }

    pub fn with_min_interval_ms(mut self, ms: u64) -> Self {
        self.min_interval_ms = ms;
        self
    }
}

/// Parse a base URL and make sure its path ends in `/`.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| Error::Config(format!("invalid API URL {:?}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(Error::Config(format!("API URL {:?} cannot be a base", raw)));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn default_user_agent() -> String {
    format!("hn-client/{}", env!("CARGO_PKG_VERSION"))
}
