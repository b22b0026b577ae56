//! `ChainQuery` over JSON-RPC `eth_call`

use alloy_primitives::{Address, I256, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use std::time::Duration;
use tracing::trace;

use super::abi::{IArchimedes, IChainlinkAggregator, IUniswapV2Router, IERC20};
use super::{ChainQuery, PoolInfo};
use crate::config::Config;
use crate::error::{HealthError, Result};

pub struct RpcChainQuery {
    provider: DynProvider,
    timeout: Duration,
}

impl RpcChainQuery {
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let url = rpc_url
            .parse()
            .map_err(|e| HealthError::Config(format!("invalid RPC url '{}': {}", rpc_url, e)))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self { provider, timeout })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.rpc_url, config.rpc_timeout())
    }

    /// Encode, `eth_call` with a deadline, decode
    async fn call<C: SolCall + Send>(&self, to: Address, call: C) -> Result<C::Return> {
        let tx = TransactionRequest::default()
            .to(to)
            .input(call.abi_encode().into());

        trace!("eth_call {} on {:?}", C::SIGNATURE, to);

        let output = tokio::time::timeout(self.timeout, self.provider.call(tx))
            .await
            .map_err(|_| HealthError::chain(C::SIGNATURE, to, format!("timed out after {:?}", self.timeout)))?
            .map_err(|e| HealthError::chain(C::SIGNATURE, to, format!("eth_call failed: {}", e)))?;

        C::abi_decode_returns(&output)
            .map_err(|e| HealthError::chain(C::SIGNATURE, to, format!("decode failed: {}", e)))
    }
}

#[async_trait]
impl ChainQuery for RpcChainQuery {
    async fn latest_answer(&self, feed: Address) -> Result<I256> {
        self.call(feed, IChainlinkAggregator::latestAnswerCall {}).await
    }

    async fn decimals(&self, contract: Address) -> Result<u8> {
        // Same selector for feeds and ERC-20 tokens
        self.call(contract, IERC20::decimalsCall {}).await
    }

    async fn get_amounts_out(&self, router: Address, amount_in: U256, path: Vec<Address>) -> Result<Vec<U256>> {
        self.call(router, IUniswapV2Router::getAmountsOutCall { amountIn: amount_in, path })
            .await
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        self.call(token, IERC20::balanceOfCall { account: owner }).await
    }

    async fn total_supply(&self, token: Address) -> Result<U256> {
        self.call(token, IERC20::totalSupplyCall {}).await
    }

    async fn pool_length(&self, registry: Address) -> Result<U256> {
        self.call(registry, IArchimedes::poolLengthCall {}).await
    }

    async fn pool_info(&self, registry: Address, pid: U256) -> Result<PoolInfo> {
        let want = self.call(registry, IArchimedes::poolInfoCall { pid }).await?;
        Ok(PoolInfo { want })
    }

    async fn pool_balance(&self, registry: Address, pid: U256) -> Result<U256> {
        self.call(registry, IArchimedes::balanceCall { pid }).await
    }
}
