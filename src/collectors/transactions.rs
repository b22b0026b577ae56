use alloy_primitives::Address;
use futures::future::try_join_all;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::config::{BlockWindow, Config};
use crate::error::{HealthError, Result};
use crate::index::{EventFilter, IndexedEventsQuery};

/// Pool registry events counted as user interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrackedEvent {
    Deposit,
    Withdraw,
    EmergencyWithdraw,
}

impl TrackedEvent {
    pub const ALL: [TrackedEvent; 3] = [
        TrackedEvent::Deposit,
        TrackedEvent::Withdraw,
        TrackedEvent::EmergencyWithdraw,
    ];

    /// Decoded event name as the index API reports it
    pub fn name(&self) -> &'static str {
        match self {
            TrackedEvent::Deposit => "Deposit",
            TrackedEvent::Withdraw => "Withdraw",
            TrackedEvent::EmergencyWithdraw => "EmergencyWithdraw",
        }
    }
}

impl fmt::Display for TrackedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Historical count of deposits and withdrawals on the pool registry
pub struct TransactionCollector {
    index: Arc<dyn IndexedEventsQuery>,
    registry: Address,
    window: BlockWindow,
    page_size: u32,
    max_pages: u32,
}

impl TransactionCollector {
    pub fn new(
        index: Arc<dyn IndexedEventsQuery>,
        registry: Address,
        window: BlockWindow,
        page_size: u32,
        max_pages: u32,
    ) -> Self {
        Self {
            index,
            registry,
            window,
            page_size,
            max_pages,
        }
    }

    pub fn from_config(index: Arc<dyn IndexedEventsQuery>, config: &Config) -> Self {
        Self::new(
            index,
            config.contracts.pool_registry,
            config.event_window,
            config.page_size,
            config.max_event_pages,
        )
    }

    /// Walk pages 0, 1, 2, ... until one comes back empty.
    ///
    /// The event endpoint reports neither a total nor a has-more flag, so the
    /// walk is sequential and ends only on an empty page.
    pub async fn count_for(&self, event: TrackedEvent) -> Result<u64> {
        let filter = EventFilter {
            contract: self.registry,
            event_name: event.name().to_string(),
            window: self.window,
        };

        let mut total = 0u64;
        let mut page = 0u32;

        loop {
            if page >= self.max_pages {
                return Err(HealthError::index(
                    "events",
                    format!("{} still returning items after {} pages", event, self.max_pages),
                ));
            }

            let items = self
                .index
                .contract_events(&filter, page, self.page_size)
                .await?
                .items
                .len() as u64;

            trace!("{} page {}: {} items", event, page, items);

            if items == 0 {
                break;
            }

            total += items;
            page += 1;
        }

        debug!("{}: {} events over {} pages", event, total, page);
        Ok(total)
    }

    /// Sum over all tracked events, each walked concurrently
    pub async fn total_transactions_count(&self) -> Result<u64> {
        let counts = try_join_all(TrackedEvent::ALL.iter().map(|e| self.count_for(*e))).await?;

        let total: u64 = counts.iter().sum();
        info!(
            "🔁 Transactions: {} (deposit {}, withdraw {}, emergency {})",
            total, counts[0], counts[1], counts[2]
        );
        Ok(total)
    }
}
