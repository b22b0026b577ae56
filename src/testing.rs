//! In-memory chain and index API for unit tests

use alloy_primitives::{Address, I256, U256};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::chain::{ChainQuery, PoolInfo};
use crate::error::{HealthError, Result};
use crate::index::{EventFilter, EventPage, EventItem, HolderItem, HolderPage, IndexedEventsQuery, Pagination};

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

/// `whole * 10^decimals`
pub fn units(whole: u64, decimals: u8) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(decimals))
}

// ============================================
// FAKE CHAIN
// ============================================

#[derive(Default)]
pub struct FakeChain {
    answers: HashMap<Address, I256>,
    decimals: HashMap<Address, u8>,
    amounts_out: Option<Vec<U256>>,
    balances: HashMap<(Address, Address), U256>,
    supplies: HashMap<Address, U256>,
    pools: Vec<(PoolInfo, U256)>,
}

fn revert(call: &'static str, contract: Address) -> HealthError {
    HealthError::chain(call, contract, "execution reverted")
}

impl FakeChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed answering `usd` with 8 decimals
    pub fn with_feed(mut self, feed: Address, usd: i64) -> Self {
        self.answers.insert(feed, I256::try_from(usd * 100_000_000).unwrap());
        self.decimals.insert(feed, 8);
        self
    }

    pub fn with_decimals(mut self, contract: Address, decimals: u8) -> Self {
        self.decimals.insert(contract, decimals);
        self
    }

    pub fn with_amounts_out(mut self, amounts: Vec<U256>) -> Self {
        self.amounts_out = Some(amounts);
        self
    }

    pub fn with_balance(mut self, token: Address, owner: Address, amount: U256) -> Self {
        self.balances.insert((token, owner), amount);
        self
    }

    pub fn with_supply(mut self, token: Address, supply: U256) -> Self {
        self.supplies.insert(token, supply);
        self
    }

    pub fn with_pool(mut self, want: Address, balance: U256) -> Self {
        self.pools.push((PoolInfo { want }, balance));
        self
    }

    fn pool(&self, registry: Address, pid: U256, call: &'static str) -> Result<&(PoolInfo, U256)> {
        usize::try_from(pid)
            .ok()
            .and_then(|i| self.pools.get(i))
            .ok_or_else(|| revert(call, registry))
    }
}

#[async_trait]
impl ChainQuery for FakeChain {
    async fn latest_answer(&self, feed: Address) -> Result<I256> {
        self.answers.get(&feed).copied().ok_or_else(|| revert("latestAnswer()", feed))
    }

    async fn decimals(&self, contract: Address) -> Result<u8> {
        self.decimals.get(&contract).copied().ok_or_else(|| revert("decimals()", contract))
    }

    async fn get_amounts_out(&self, router: Address, _amount_in: U256, _path: Vec<Address>) -> Result<Vec<U256>> {
        self.amounts_out.clone().ok_or_else(|| revert("getAmountsOut(uint256,address[])", router))
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        self.balances
            .get(&(token, owner))
            .copied()
            .ok_or_else(|| revert("balanceOf(address)", token))
    }

    async fn total_supply(&self, token: Address) -> Result<U256> {
        self.supplies.get(&token).copied().ok_or_else(|| revert("totalSupply()", token))
    }

    async fn pool_length(&self, _registry: Address) -> Result<U256> {
        Ok(U256::from(self.pools.len()))
    }

    async fn pool_info(&self, registry: Address, pid: U256) -> Result<PoolInfo> {
        Ok(self.pool(registry, pid, "poolInfo(uint256)")?.0)
    }

    async fn pool_balance(&self, registry: Address, pid: U256) -> Result<U256> {
        Ok(self.pool(registry, pid, "balance(uint256)")?.1)
    }
}

// ============================================
// FAKE INDEX API
// ============================================

/// Missing pages come back empty. Every request is recorded.
#[derive(Default)]
pub struct FakeIndex {
    holder_pages: HashMap<(Address, u32), HolderPage>,
    event_pages: HashMap<(String, u32), usize>,
    failing_tokens: HashSet<Address>,
    failing_events: HashSet<String>,
    pub holder_calls: Mutex<Vec<(Address, u32)>>,
    pub event_calls: Mutex<Vec<(String, u32)>>,
}

impl FakeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holder_page(
        mut self,
        token: Address,
        page: u32,
        addresses: &[&str],
        pagination: Option<Pagination>,
    ) -> Self {
        let items = addresses
            .iter()
            .map(|a| HolderItem { address: a.to_string() })
            .collect();
        self.holder_pages.insert((token, page), HolderPage { items, pagination });
        self
    }

    pub fn with_failing_token(mut self, token: Address) -> Self {
        self.failing_tokens.insert(token);
        self
    }

    /// Page sizes for consecutive pages of one event, starting at page 0
    pub fn with_event_pages(mut self, event_name: &str, counts: &[usize]) -> Self {
        for (page, count) in counts.iter().enumerate() {
            self.event_pages.insert((event_name.to_string(), page as u32), *count);
        }
        self
    }

    pub fn with_failing_event(mut self, event_name: &str) -> Self {
        self.failing_events.insert(event_name.to_string());
        self
    }

    pub fn holder_pages_requested(&self, token: Address) -> Vec<u32> {
        let mut pages: Vec<u32> = self
            .holder_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| *t == token)
            .map(|(_, p)| *p)
            .collect();
        pages.sort_unstable();
        pages
    }

    pub fn event_pages_requested(&self, event_name: &str) -> Vec<u32> {
        self.event_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| e == event_name)
            .map(|(_, p)| *p)
            .collect()
    }
}

#[async_trait]
impl IndexedEventsQuery for FakeIndex {
    async fn token_holders(&self, token: Address, page: u32, _page_size: u32) -> Result<HolderPage> {
        self.holder_calls.lock().unwrap().push((token, page));

        if self.failing_tokens.contains(&token) {
            return Err(HealthError::index("token_holders", "HTTP 503 Service Unavailable"));
        }
        Ok(self.holder_pages.get(&(token, page)).cloned().unwrap_or_default())
    }

    async fn contract_events(&self, filter: &EventFilter, page: u32, _page_size: u32) -> Result<EventPage> {
        self.event_calls
            .lock()
            .unwrap()
            .push((filter.event_name.clone(), page));

        if self.failing_events.contains(&filter.event_name) {
            return Err(HealthError::index("events", "HTTP 500 Internal Server Error"));
        }

        let count = self
            .event_pages
            .get(&(filter.event_name.clone(), page))
            .copied()
            .unwrap_or(0);

        let items = (0..count)
            .map(|i| EventItem {
                block_height: Some(filter.window.starting_block + i as u64),
                tx_hash: None,
                decoded: None,
            })
            .collect();

        Ok(EventPage { items })
    }
}
