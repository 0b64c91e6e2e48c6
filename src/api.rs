//! Places service client (GeoDB Cities compatible)

use std::sync::OnceLock;

use serde::Deserialize;
use tracing::debug;

use crate::config::ApiConfig;
use crate::state::{PlaceQuery, PlaceRecord, ResultSet};

const HOST_HEADER: &str = "X-RapidAPI-Host";
const KEY_HEADER: &str = "X-RapidAPI-Key";
const FLAG_BASE: &str = "https://flagsapi.com";

/// Response body from the places service
#[derive(Debug, Deserialize)]
struct PlacesResponse {
    data: Vec<PlaceRecord>,
    metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(rename = "totalCount")]
    total_count: u32,
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// Transport failure or a non-success status
    #[error("request failed: {0}")]
    Network(String),
    /// Body did not have the expected shape
    #[error("response parse error: {0}")]
    Decode(String),
    /// Shared client missing or installed twice
    #[error("client setup: {0}")]
    Client(&'static str),
}

static PLACES_CLIENT: OnceLock<PlacesClient> = OnceLock::new();

/// Make `client` the one used by every fetch. Only the first call wins.
pub fn install_client(client: PlacesClient) -> Result<(), FetchError> {
    PLACES_CLIENT
        .set(client)
        .map_err(|_| FetchError::Client("places client already installed"))
}

/// The client installed at startup
pub fn places_client() -> Result<&'static PlacesClient, FetchError> {
    PLACES_CLIENT
        .get()
        .ok_or(FetchError::Client("places client not installed"))
}

pub struct PlacesClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl PlacesClient {
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Full request URL for a query, parameters percent-encoded
    pub fn request_url(&self, query: &PlaceQuery) -> String {
        let separator = if self.config.base_url.contains('?') {
            '&'
        } else {
            '?'
        };
        format!(
            "{}{}namePrefix={}&countryIds={}&offset={}&limit={}",
            self.config.base_url,
            separator,
            urlencoding::encode(&query.name_prefix),
            urlencoding::encode(&query.country_ids),
            query.offset,
            query.limit
        )
    }

    /// Fetch one page of places. Single attempt, no retries.
    pub async fn fetch_places(&self, query: &PlaceQuery) -> Result<ResultSet, FetchError> {
        let url = self.request_url(query);
        debug!(seq = query.seq, %url, "fetching places");

        let mut request = self.client.get(&url);
        if let Some(host) = &self.config.host {
            request = request.header(HOST_HEADER, host.as_str());
        }
        if let Some(key) = &self.config.api_key {
            request = request.header(KEY_HEADER, key.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        decode_places(&bytes)
    }
}

/// Decode a `{ data, metadata: { totalCount } }` body
pub fn decode_places(bytes: &[u8]) -> Result<ResultSet, FetchError> {
    let body: PlacesResponse =
        serde_json::from_slice(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(ResultSet {
        records: body.data,
        total_count: body.metadata.total_count,
    })
}

/// Flag image for an ISO 3166-1 alpha-2 country code
pub fn flag_url(country_code: &str) -> String {
    format!(
        "{FLAG_BASE}/{}/flat/64.png",
        country_code.trim().to_ascii_uppercase()
    )
}

/// Regional-indicator flag glyph, the terminal stand-in for the flag image
pub fn flag_emoji(country_code: &str) -> Option<String> {
    let code = country_code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    code.to_ascii_uppercase()
        .chars()
        .map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}
