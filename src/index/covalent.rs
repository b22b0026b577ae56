//! Covalent-style HTTP client for the index API
//!
//! API: {base}/{chain_id}/tokens/{token}/token_holders/
//!      {base}/{chain_id}/events/address/{contract}/

use alloy_primitives::Address;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::trace;

use super::{EventFilter, EventPage, HolderPage, IndexedEventsQuery};
use crate::config::Config;
use crate::error::{HealthError, Result};

// ============================================
// API RESPONSE TYPES
// ============================================

/// Every response is wrapped in this envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    error: bool,
    error_message: Option<String>,
    error_code: Option<i64>,
}

/// Unwrap the envelope of a response body
fn decode_envelope<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| HealthError::index(endpoint, format!("malformed response: {}", e)))?;

    if envelope.error {
        return Err(HealthError::index(
            endpoint,
            format!(
                "{} (code {})",
                envelope.error_message.unwrap_or_else(|| "unknown error".to_string()),
                envelope.error_code.unwrap_or_default()
            ),
        ));
    }

    envelope
        .data
        .ok_or_else(|| HealthError::index(endpoint, "response has no data"))
}

// ============================================
// CLIENT
// ============================================

pub struct CovalentClient {
    http_client: Client,
    base_url: String,
    chain_id: u64,
    api_key: String,
}

impl CovalentClient {
    pub fn new(base_url: &str, chain_id: u64, api_key: String, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HealthError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            chain_id,
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .index_api_key
            .clone()
            .ok_or_else(|| HealthError::Config("index API key missing".into()))?;

        Self::new(&config.index_api_url, config.chain_id, api_key, config.index_timeout())
    }

    fn holders_url(&self, token: Address) -> String {
        format!("{}/{}/tokens/{:?}/token_holders/", self.base_url, self.chain_id, token)
    }

    fn events_url(&self, contract: Address) -> String {
        format!("{}/{}/events/address/{:?}/", self.base_url, self.chain_id, contract)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, url: &str, query: &[(&str, String)]) -> Result<T> {
        trace!("GET {} {:?}", url, query);

        let response = self
            .http_client
            .get(url)
            .query(query)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HealthError::index(endpoint, "request timed out")
                } else {
                    HealthError::index(endpoint, e)
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| HealthError::index(endpoint, e))?;

        if !status.is_success() {
            return Err(HealthError::index(endpoint, format!("HTTP {}", status)));
        }

        decode_envelope(endpoint, &body)
    }
}

#[async_trait]
impl IndexedEventsQuery for CovalentClient {
    async fn token_holders(&self, token: Address, page: u32, page_size: u32) -> Result<HolderPage> {
        let query = [
            ("page-number", page.to_string()),
            ("page-size", page_size.to_string()),
        ];

        self.get("token_holders", &self.holders_url(token), &query).await
    }

    async fn contract_events(&self, filter: &EventFilter, page: u32, page_size: u32) -> Result<EventPage> {
        let query = [
            ("page-number", page.to_string()),
            ("page-size", page_size.to_string()),
            ("starting-block", filter.window.starting_block.to_string()),
            ("ending-block", filter.window.ending_block.to_string()),
            ("match", json!({ "decoded.name": filter.event_name }).to_string()),
        ];

        self.get("events", &self.events_url(filter.contract), &query).await
    }
}

// ============================================
// TESTS
// ============================================
