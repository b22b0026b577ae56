use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use std::sync::Arc;
use tracing::debug;

use super::PriceOracleAdapter;
use crate::chain::{ChainQuery, IUniswapV2Router};
use crate::config::Config;
use crate::error::{HealthError, Result};
use crate::units::{one_unit, to_decimal, GOVERNANCE_TOKEN_DECIMALS};

/// Prices the governance token, which has no feed of its own, as
/// `referenceUsd * (governance received for 1 reference unit)`.
pub struct PairPriceResolver {
    chain: Arc<dyn ChainQuery>,
    oracle: Arc<PriceOracleAdapter>,
    router: Address,
    reference_asset: Address,
    governance_token: Address,
}

impl PairPriceResolver {
    pub fn new(
        chain: Arc<dyn ChainQuery>,
        oracle: Arc<PriceOracleAdapter>,
        router: Address,
        reference_asset: Address,
        governance_token: Address,
    ) -> Self {
        Self {
            chain,
            oracle,
            router,
            reference_asset,
            governance_token,
        }
    }

    pub fn from_config(chain: Arc<dyn ChainQuery>, oracle: Arc<PriceOracleAdapter>, config: &Config) -> Self {
        let c = &config.contracts;
        Self::new(chain, oracle, c.router, c.reference_asset, c.governance_token)
    }

    pub async fn price_of_governance_token(&self) -> Result<f64> {
        let path = vec![self.reference_asset, self.governance_token];

        let (amounts, reference_usd) = tokio::try_join!(
            self.chain.get_amounts_out(self.router, one_unit(), path),
            self.oracle.price_for_token(self.reference_asset),
        )?;

        let quoted = amounts.get(1).copied().ok_or_else(|| {
            HealthError::chain(
                IUniswapV2Router::getAmountsOutCall::SIGNATURE,
                self.router,
                format!("expected 2 amounts, got {}", amounts.len()),
            )
        })?;

        let ratio = to_decimal(quoted, GOVERNANCE_TOKEN_DECIMALS)?;
        let price = reference_usd * ratio;

        debug!(
            "Governance token: {:.6} per reference unit @ ${:.4} = ${:.6}",
            ratio, reference_usd, price
        );

        Ok(price)
    }
}
