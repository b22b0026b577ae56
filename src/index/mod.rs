//! Indexed-events API: paginated holder lists and decoded event logs

mod covalent;

pub use covalent::CovalentClient;

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::BlockWindow;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderItem {
    pub address: String,
}

/// Paging metadata reported with holder lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderPage {
    #[serde(default)]
    pub items: Vec<HolderItem>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedEvent {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventItem {
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub decoded: Option<DecodedEvent>,
}

/// Event pages carry no total count and no has-more flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPage {
    #[serde(default)]
    pub items: Vec<EventItem>,
}

/// Which logs to list: one contract, one decoded event name, one block window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub contract: Address,
    pub event_name: String,
    pub window: BlockWindow,
}

#[async_trait]
pub trait IndexedEventsQuery: Send + Sync {
    /// One page of token holders (pages start at 0)
    async fn token_holders(&self, token: Address, page: u32, page_size: u32) -> Result<HolderPage>;

    /// One page of decoded logs matching `filter` (pages start at 0)
    async fn contract_events(&self, filter: &EventFilter, page: u32, page_size: u32) -> Result<EventPage>;
}
