use alloy_primitives::Address;
use futures::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{HealthError, Result};
use crate::index::IndexedEventsQuery;

/// Unique holders across the governance and staked-governance tokens
pub struct HolderCollector {
    index: Arc<dyn IndexedEventsQuery>,
    tokens: Vec<Address>,
    page_size: u32,
}

impl HolderCollector {
    pub fn new(index: Arc<dyn IndexedEventsQuery>, tokens: Vec<Address>, page_size: u32) -> Self {
        Self {
            index,
            tokens,
            page_size,
        }
    }

    pub fn from_config(index: Arc<dyn IndexedEventsQuery>, config: &Config) -> Self {
        let tokens = vec![config.contracts.governance_token, config.contracts.staked_vault];
        Self::new(index, tokens, config.page_size)
    }

    /// All holder addresses of one token.
    ///
    /// Page 0 decides the fan-out: when it reports more pages, pages
    /// `1..=total_count / page_size` are fetched concurrently. Those pages
    /// never fan out themselves. Without a `total_count` only page 0 is kept.
    pub async fn holders_for(&self, token: Address) -> Result<Vec<String>> {
        let first = self.index.token_holders(token, 0, self.page_size).await?;
        let mut addresses: Vec<String> = first.items.into_iter().map(|i| i.address).collect();

        let pagination = first.pagination.unwrap_or_default();
        if !pagination.has_more {
            return Ok(addresses);
        }

        let Some(total_count) = pagination.total_count else {
            warn!("{:?}: has_more without total_count, keeping page 0 only", token);
            return Ok(addresses);
        };

        let last_page = total_count
            .checked_div(u64::from(self.page_size))
            .ok_or_else(|| HealthError::index("token_holders", "page size is zero"))?;
        let last_page = u32::try_from(last_page).map_err(|_| {
            HealthError::index("token_holders", format!("total_count {} out of range", total_count))
        })?;

        debug!("{:?}: {} holders over pages 0..={}", token, total_count, last_page);

        let pages = try_join_all(
            (1..=last_page).map(|page| self.index.token_holders(token, page, self.page_size)),
        )
        .await?;

        addresses.extend(pages.into_iter().flat_map(|p| p.items).map(|i| i.address));
        Ok(addresses)
    }

    /// Union of every token's holders, lowercased. Built only after all page
    /// walks have finished.
    pub async fn unique_holders(&self) -> Result<HashSet<String>> {
        let per_token = try_join_all(self.tokens.iter().map(|t| self.holders_for(*t))).await?;

        Ok(per_token
            .into_iter()
            .flatten()
            .map(|a| a.to_lowercase())
            .collect())
    }

    /// Unique holder count. Any collection failure counts as zero holders.
    pub async fn holders_count(&self) -> u64 {
        match self.unique_holders().await {
            Ok(holders) => {
                info!("👥 Holders: {}", holders.len());
                holders.len() as u64
            }
            Err(e) => {
                warn!("Holder collection failed, counting 0 holders: {}", e);
                0
            }
        }
    }
}
