//! Read-only contract calls
//!
//! Collectors never talk to a provider directly; they hold an
//! `Arc<dyn ChainQuery>` so tests can swap in an in-memory chain.

mod abi;
mod rpc;

pub use abi::{IArchimedes, IChainlinkAggregator, IUniswapV2Router, IERC20};
pub use rpc::RpcChainQuery;

use alloy_primitives::{Address, I256, U256};
use async_trait::async_trait;

use crate::error::Result;

/// Per-pool record from the pool registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolInfo {
    /// Underlying asset the pool accepts
    pub want: Address,
}

/// Side-effect-free contract reads against one chain
#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// `latestAnswer()` of a price feed
    async fn latest_answer(&self, feed: Address) -> Result<I256>;

    /// `decimals()` of a price feed or an ERC-20 token
    async fn decimals(&self, contract: Address) -> Result<u8>;

    /// `getAmountsOut(amountIn, path)` on a UniswapV2-style router
    async fn get_amounts_out(&self, router: Address, amount_in: U256, path: Vec<Address>) -> Result<Vec<U256>>;

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256>;

    async fn total_supply(&self, token: Address) -> Result<U256>;

    async fn pool_length(&self, registry: Address) -> Result<U256>;

    async fn pool_info(&self, registry: Address, pid: U256) -> Result<PoolInfo>;

    /// Locked balance of a pool, in the want token's smallest unit
    async fn pool_balance(&self, registry: Address, pid: U256) -> Result<U256>;
}
