//! Connection settings for the places service

use std::time::Duration;

use tracing::{info, warn};

use crate::state::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub const DEFAULT_BASE_URL: &str = "https://wft-geo-db.p.rapidapi.com/v1/geo/cities";
pub const DEFAULT_HOST: &str = "wft-geo-db.p.rapidapi.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where to send requests and how to authenticate them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Sent as the host identifier header
    pub host: Option<String>,
    /// Sent as the API key header
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            host: Some(DEFAULT_HOST.to_string()),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Build from already-resolved settings; blank values count as unset.
    pub fn new(
        base_url: Option<String>,
        host: Option<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Self {
        let defaults = Self::default();
        let base_url = non_blank(base_url).unwrap_or_else(|| {
            info!("API_BASE_URL not set, using default: {}", defaults.base_url);
            defaults.base_url
        });
        let host = non_blank(host).or(defaults.host);
        let api_key = non_blank(api_key);
        if api_key.is_none() {
            warn!("API_KEY not set, requests to {base_url} will likely be rejected");
        }

        Self {
            base_url,
            host,
            api_key,
            timeout: Duration::from_secs(timeout_secs.max(1)),
        }
    }
}

/// Validate the page size given at startup, falling back to the default
pub fn initial_page_size(requested: u32) -> u32 {
    if (1..=MAX_PAGE_SIZE).contains(&requested) {
        requested
    } else {
        warn!(
            "page size {requested} outside 1..={MAX_PAGE_SIZE}, using {DEFAULT_PAGE_SIZE}"
        );
        DEFAULT_PAGE_SIZE
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
