use alloy_primitives::{Address, I256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::chain::ChainQuery;
use crate::config::Config;
use crate::error::{HealthError, Result};
use crate::units::to_decimal;

/// Raw feed reading before decimal normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePoint {
    pub raw_answer: I256,
    pub decimals: u8,
}

impl PricePoint {
    /// `raw_answer / 10^decimals`
    pub fn usd(&self) -> Result<f64> {
        to_decimal(self.raw_answer, self.decimals)
    }
}

/// Token → USD through configured price feeds. No retries.
pub struct PriceOracleAdapter {
    chain: Arc<dyn ChainQuery>,
    feeds: HashMap<Address, Address>,
}

impl PriceOracleAdapter {
    pub fn new(chain: Arc<dyn ChainQuery>, feeds: HashMap<Address, Address>) -> Self {
        Self { chain, feeds }
    }

    pub fn from_config(chain: Arc<dyn ChainQuery>, config: &Config) -> Self {
        Self::new(chain, config.oracle_map())
    }

    /// Feed configured for `token`; absence is an error, never a zero price
    pub fn feed_for(&self, token: Address) -> Result<Address> {
        self.feeds
            .get(&token)
            .copied()
            .ok_or(HealthError::UnknownOracle { token })
    }

    /// Answer and decimals, read concurrently
    pub async fn price_point(&self, token: Address) -> Result<PricePoint> {
        let feed = self.feed_for(token)?;

        let (raw_answer, decimals) =
            tokio::try_join!(self.chain.latest_answer(feed), self.chain.decimals(feed))?;

        Ok(PricePoint { raw_answer, decimals })
    }

    pub async fn price_for_token(&self, token: Address) -> Result<f64> {
        let price = self.price_point(token).await?.usd()?;
        debug!("Price for {:?}: ${:.6}", token, price);
        Ok(price)
    }
}
