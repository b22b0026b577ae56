use alloy_primitives::Address;
use std::sync::Arc;
use tracing::info;

use crate::chain::ChainQuery;
use crate::error::Result;
use crate::pricing::PairPriceResolver;
use crate::units::{to_decimal, GOVERNANCE_TOKEN_DECIMALS};

/// Governance token market cap in USD
pub struct MarketCapCollector {
    chain: Arc<dyn ChainQuery>,
    pair: Arc<PairPriceResolver>,
    governance_token: Address,
}

impl MarketCapCollector {
    pub fn new(chain: Arc<dyn ChainQuery>, pair: Arc<PairPriceResolver>, governance_token: Address) -> Self {
        Self {
            chain,
            pair,
            governance_token,
        }
    }

    pub async fn market_cap(&self) -> Result<f64> {
        let (price, supply) = tokio::try_join!(
            self.pair.price_of_governance_token(),
            self.chain.total_supply(self.governance_token),
        )?;

        let cap = price * to_decimal(supply, GOVERNANCE_TOKEN_DECIMALS)?;
        info!("💰 Market cap: ${:.2}", cap);
        Ok(cap)
    }
}
