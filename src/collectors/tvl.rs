use alloy_primitives::{Address, U256};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

use crate::chain::ChainQuery;
use crate::config::Config;
use crate::error::{HealthError, Result};
use crate::pricing::{PairPriceResolver, PriceOracleAdapter};
use crate::units::{to_decimal, GOVERNANCE_TOKEN_DECIMALS};

/// Total value locked in USD: staking vault plus every registry pool
pub struct TvlCollector {
    chain: Arc<dyn ChainQuery>,
    oracle: Arc<PriceOracleAdapter>,
    pair: Arc<PairPriceResolver>,
    governance_token: Address,
    staked_vault: Address,
    pool_registry: Address,
}

impl TvlCollector {
    pub fn new(
        chain: Arc<dyn ChainQuery>,
        oracle: Arc<PriceOracleAdapter>,
        pair: Arc<PairPriceResolver>,
        governance_token: Address,
        staked_vault: Address,
        pool_registry: Address,
    ) -> Self {
        Self {
            chain,
            oracle,
            pair,
            governance_token,
            staked_vault,
            pool_registry,
        }
    }

    pub fn from_config(
        chain: Arc<dyn ChainQuery>,
        oracle: Arc<PriceOracleAdapter>,
        pair: Arc<PairPriceResolver>,
        config: &Config,
    ) -> Self {
        let c = &config.contracts;
        Self::new(chain, oracle, pair, c.governance_token, c.staked_vault, c.pool_registry)
    }

    /// Governance tokens held by the vault, priced through the pair
    pub async fn vault_tvl(&self) -> Result<f64> {
        let (price, amount) = tokio::try_join!(
            self.pair.price_of_governance_token(),
            self.chain.balance_of(self.governance_token, self.staked_vault),
        )?;

        let tvl = price * to_decimal(amount, GOVERNANCE_TOKEN_DECIMALS)?;
        debug!("Vault TVL: ${:.2}", tvl);
        Ok(tvl)
    }

    /// One pool: want token and balance, then price and decimals
    pub async fn pool_tvl(&self, pid: u64) -> Result<f64> {
        let pid_word = U256::from(pid);

        let (info, balance) = tokio::try_join!(
            self.chain.pool_info(self.pool_registry, pid_word),
            self.chain.pool_balance(self.pool_registry, pid_word),
        )?;

        let (price, decimals) = tokio::try_join!(
            self.oracle.price_for_token(info.want),
            self.chain.decimals(info.want),
        )?;

        let tvl = price * to_decimal(balance, decimals)?;
        debug!("Pool {} ({:?}) TVL: ${:.2}", pid, info.want, tvl);
        Ok(tvl)
    }

    /// Every pool in `[0, poolLength)`, all in flight at once
    async fn pools_tvl(&self) -> Result<Vec<f64>> {
        let length = self.chain.pool_length(self.pool_registry).await?;
        let length = u64::try_from(length).map_err(|_| {
            HealthError::chain("poolLength()", self.pool_registry, format!("pool length {} out of range", length))
        })?;

        try_join_all((0..length).map(|pid| self.pool_tvl(pid))).await
    }

    /// Vault plus all pools. One failed pool fails the whole sum.
    pub async fn total_tvl(&self) -> Result<f64> {
        let (vault, pools) = tokio::try_join!(self.vault_tvl(), self.pools_tvl())?;

        let total = vault + pools.iter().sum::<f64>();
        info!("📊 TVL: ${:.2} (vault ${:.2} + {} pools)", total, vault, pools.len());
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{addr, units, FakeChain};
    use std::collections::HashMap;

    const WETH: u8 = 0xe7;
    const WETH_FEED: u8 = 0xf1;
    const USDC: u8 = 0xc0;
    const USDC_FEED: u8 = 0xf2;
    const DAI: u8 = 0xda;
    const GOV: u8 = 0x2a;
    const VAULT: u8 = 0x5a;
    const REGISTRY: u8 = 0xa1;

    fn collector(chain: FakeChain) -> TvlCollector {
        let chain: Arc<dyn ChainQuery> = Arc::new(chain);
        let feeds = HashMap::from([
            (addr(WETH), addr(WETH_FEED)),
            (addr(USDC), addr(USDC_FEED)),
        ]);
        let oracle = Arc::new(PriceOracleAdapter::new(chain.clone(), feeds));
        let pair = Arc::new(PairPriceResolver::new(
            chain.clone(),
            oracle.clone(),
            addr(0x0e),
            addr(WETH),
            addr(GOV),
        ));
        TvlCollector::new(chain, oracle, pair, addr(GOV), addr(VAULT), addr(REGISTRY))
    }

    fn base_chain() -> FakeChain {
        // GOV = $2 (1 WETH @ $2 quotes 1 GOV)
        FakeChain::new()
            .with_feed(addr(WETH_FEED), 2)
            .with_amounts_out(vec![units(1, 18), units(1, 18)])
            .with_balance(addr(GOV), addr(VAULT), units(1_000, 18))
    }

    #[tokio::test]
    async fn test_vault_only() {
        let tvl = collector(base_chain()).total_tvl().await.unwrap();
        assert!((tvl - 2_000.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_vault_plus_pools() {
        let chain = base_chain()
            .with_feed(addr(USDC_FEED), 1)
            .with_decimals(addr(USDC), 6)
            .with_decimals(addr(WETH), 18)
            // 5,000 USDC and 3 WETH @ $2
            .with_pool(addr(USDC), units(5_000, 6))
            .with_pool(addr(WETH), units(3, 18));

        let tvl = collector(chain).total_tvl().await.unwrap();
        assert!((tvl - (2_000.0 + 5_000.0 + 6.0)).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_single_pool_price_failure_aborts_total() {
        // Pool 1 accepts DAI, which has no price feed
        let chain = base_chain()
            .with_feed(addr(USDC_FEED), 1)
            .with_decimals(addr(USDC), 6)
            .with_decimals(addr(DAI), 18)
            .with_pool(addr(USDC), units(5_000, 6))
            .with_pool(addr(DAI), units(10, 18));

        let result = collector(chain).total_tvl().await;
        match result {
            Err(HealthError::UnknownOracle { token }) => assert_eq!(token, addr(DAI)),
            other => panic!("expected the whole sum to fail, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_pool_decimals_failure_aborts_total() {
        // USDC is priced but its decimals() reverts
        let chain = base_chain()
            .with_feed(addr(USDC_FEED), 1)
            .with_pool(addr(USDC), units(5_000, 6));

        assert!(collector(chain).total_tvl().await.is_err());
    }
}
