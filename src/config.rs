//! Static configuration for the health score job
//!
//! Contract addresses, the token → price-feed map, the event block window and
//! the timeouts applied to every external call. Defaults describe the Polygon
//! Mumbai deployment; everything can be overridden from the environment (and
//! a `.env` file) or loaded from a TOML file.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{HealthError, Result};

// ============================================
// CONTRACTS
// ============================================

/// Protocol contracts read by the collectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// Liquid asset the governance token is quoted against (WETH)
    pub reference_asset: Address,

    /// UniswapV2-style router used for `getAmountsOut`
    pub router: Address,

    /// Governance token (18 decimals, no price feed of its own)
    pub governance_token: Address,

    /// Staking vault; also the staked-governance-token contract
    pub staked_vault: Address,

    /// Yield-pool registry exposing `poolLength`, `poolInfo` and `balance`
    pub pool_registry: Address,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            reference_asset: address!("3C68CE8504087f89c640D02d133646d98e64ddd9"),
            router: address!("1b02dA8Cb0d097eB8D57A175b88c7D8b47997506"),
            governance_token: address!("43B711D46746C5Be8ACa96A7B00807fbD1b7dfE9"),
            staked_vault: address!("65140719EBc1F5D70C273811B4d752031c2b469D"),
            pool_registry: address!("5986FD34a3073bE5F6A74e850518EdC099AdC79c"),
        }
    }
}

/// One token → USD price feed pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleFeed {
    pub symbol: String,
    pub token: Address,
    pub feed: Address,
}

impl OracleFeed {
    fn new(symbol: &str, token: Address, feed: Address) -> Self {
        Self {
            symbol: symbol.to_string(),
            token,
            feed,
        }
    }
}

/// Inclusive block range scanned for protocol events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockWindow {
    pub starting_block: u64,
    pub ending_block: u64,
}

impl Default for BlockWindow {
    fn default() -> Self {
        // Fixed historical window, not "launch to latest"
        Self {
            starting_block: 16_527_242,
            ending_block: 16_529_548,
        }
    }
}

// ============================================
// MAIN CONFIGURATION
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // ========== Network Settings ==========
    /// JSON-RPC endpoint for contract reads
    pub rpc_url: String,

    /// Chain ID, also used in index API paths (80001 = Mumbai)
    pub chain_id: u64,

    // ========== Index API ==========
    /// Base URL of the indexed-events API
    pub index_api_url: String,

    /// Bearer token for the index API (KEEP SECRET!)
    pub index_api_key: Option<String>,

    // ========== Pagination ==========
    /// Items per page for holder and event listings
    pub page_size: u32,

    /// Upper bound on pages walked per event name
    pub max_event_pages: u32,

    // ========== Timeouts ==========
    pub rpc_timeout_secs: u64,
    pub index_timeout_secs: u64,

    // ========== Protocol ==========
    pub contracts: ContractAddresses,

    /// Token → price feed map; a token missing here cannot be priced
    pub oracles: Vec<OracleFeed>,

    pub event_window: BlockWindow,
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let contracts = ContractAddresses {
            reference_asset: env_address("REFERENCE_ASSET_ADDRESS", defaults.contracts.reference_asset)?,
            router: env_address("ROUTER_ADDRESS", defaults.contracts.router)?,
            governance_token: env_address("GOVERNANCE_TOKEN_ADDRESS", defaults.contracts.governance_token)?,
            staked_vault: env_address("STAKED_VAULT_ADDRESS", defaults.contracts.staked_vault)?,
            pool_registry: env_address("POOL_REGISTRY_ADDRESS", defaults.contracts.pool_registry)?,
        };

        let oracles = match env::var("ORACLE_FEEDS") {
            Ok(raw) => parse_oracle_feeds(&raw)?,
            Err(_) => defaults.oracles,
        };

        Ok(Self {
            rpc_url: env::var("RPC_URL").unwrap_or(defaults.rpc_url),
            chain_id: env_parse("CHAIN_ID", defaults.chain_id),
            index_api_url: env::var("INDEX_API_URL").unwrap_or(defaults.index_api_url),
            index_api_key: env::var("INDEX_API_KEY").ok(),
            contracts,
            oracles,
            event_window: BlockWindow {
                starting_block: env_parse("STARTING_BLOCK", defaults.event_window.starting_block),
                ending_block: env_parse("ENDING_BLOCK", defaults.event_window.ending_block),
            },
            page_size: env_parse("PAGE_SIZE", defaults.page_size),
            max_event_pages: env_parse("MAX_EVENT_PAGES", defaults.max_event_pages),
            rpc_timeout_secs: env_parse("RPC_TIMEOUT_SECS", defaults.rpc_timeout_secs),
            index_timeout_secs: env_parse("INDEX_TIMEOUT_SECS", defaults.index_timeout_secs),
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| HealthError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content).map_err(|e| HealthError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| HealthError::Config(e.to_string()))?;
        fs::write(path, content).map_err(|e| HealthError::Config(e.to_string()))
    }

    /// Token → feed lookup table
    pub fn oracle_map(&self) -> HashMap<Address, Address> {
        self.oracles.iter().map(|o| (o.token, o.feed)).collect()
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn index_timeout(&self) -> Duration {
        Duration::from_secs(self.index_timeout_secs)
    }

    /// Validate configuration before any network call is made
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() || self.rpc_url.contains("YOUR_API_KEY") {
            return Err(HealthError::Config("RPC_URL is not set".into()));
        }
        if self.index_api_url.is_empty() {
            return Err(HealthError::Config("INDEX_API_URL is not set".into()));
        }
        match self.index_api_key.as_deref() {
            None | Some("") => {
                return Err(HealthError::Config(
                    "index API key missing (set INDEX_API_KEY)".into(),
                ));
            }
            _ => {}
        }
        if self.page_size == 0 {
            return Err(HealthError::Config("PAGE_SIZE must be > 0".into()));
        }
        if self.max_event_pages == 0 {
            return Err(HealthError::Config("MAX_EVENT_PAGES must be > 0".into()));
        }
        if self.event_window.starting_block > self.event_window.ending_block {
            return Err(HealthError::Config(format!(
                "event window is inverted ({} > {})",
                self.event_window.starting_block, self.event_window.ending_block
            )));
        }
        if self.rpc_timeout_secs == 0 || self.index_timeout_secs == 0 {
            return Err(HealthError::Config("timeouts must be > 0 seconds".into()));
        }
        if self.oracles.is_empty() {
            return Err(HealthError::Config("oracle map is empty".into()));
        }

        let mut seen = HashSet::new();
        for oracle in &self.oracles {
            if !seen.insert(oracle.token) {
                return Err(HealthError::Config(format!(
                    "duplicate price feed for token {:?} ({})",
                    oracle.token, oracle.symbol
                )));
            }
        }

        // The governance price is derived through the reference asset's feed
        if !seen.contains(&self.contracts.reference_asset) {
            return Err(HealthError::Config(format!(
                "reference asset {:?} has no price feed",
                self.contracts.reference_asset
            )));
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              PROTOCOL HEALTH SCORE - CONFIG                ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Chain ID:          {:^40} ║", self.chain_id);
        println!("║ Price Feeds:       {:^40} ║", self.oracles.len());
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ EVENT WINDOW                                               ║");
        println!("║ • From Block:      {:^40} ║", self.event_window.starting_block);
        println!("║ • To Block:        {:^40} ║", self.event_window.ending_block);
        println!("║ • Page Size:       {:^40} ║", self.page_size);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ TIMEOUTS                                                   ║");
        println!("║ • RPC:             {:>38} s ║", self.rpc_timeout_secs);
        println!("║ • Index API:       {:>38} s ║", self.index_timeout_secs);
        println!("║ • API Key:         {:^40} ║",
            if self.index_api_key.is_some() { "✓ Configured" } else { "✗ Not Set" }
        );
        println!("╚════════════════════════════════════════════════════════════╝");
    }

    fn default_oracles() -> Vec<OracleFeed> {
        vec![
            OracleFeed::new(
                "BTC",
                address!("0d787a4a1548f673ed375445535a6c7A1EE56180"),
                address!("007A22900a3B98143368Bd5906f8E17e9867581b"),
            ),
            OracleFeed::new(
                "DAI",
                address!("001B3B4d0F3714Ca98ba10F6042DaEbF0B1B7b6F"),
                address!("0FCAa9c899EC5A91eBc3D5Dd869De833b06fB046"),
            ),
            OracleFeed::new(
                "MATIC",
                address!("9c3C9283D3e44854697Cd22D3Faa240Cfb032889"),
                address!("d0D5e3DB44DE05E9F294BB0a3bEEaF030DE24Ada"),
            ),
            OracleFeed::new(
                "USDC",
                address!("2058A9D7613eEE744279e3856Ef0eAda5FCbaA7e"),
                address!("572dDec9087154dC5dfBB1546Bb62713147e0Ab0"),
            ),
            OracleFeed::new(
                "USDT",
                address!("BD21A10F619BE90d6066c941b04e340841F1F989"),
                address!("92C09849638959196E976289418e5973CC96d645"),
            ),
            OracleFeed::new(
                "ETH",
                address!("3C68CE8504087f89c640D02d133646d98e64ddd9"),
                address!("0715A7794a1dc8e42615F059dD6e406A6594651A"),
            ),
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc-mumbai.maticvigil.com".to_string(),
            chain_id: 80001,
            index_api_url: "https://api.covalenthq.com/v1".to_string(),
            index_api_key: None,
            contracts: ContractAddresses::default(),
            oracles: Self::default_oracles(),
            event_window: BlockWindow::default(),
            page_size: 200,
            max_event_pages: 5_000,
            rpc_timeout_secs: 15,
            index_timeout_secs: 30,
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_address(key: &str, default: Address) -> Result<Address> {
    match env::var(key) {
        Ok(raw) => Address::from_str(raw.trim())
            .map_err(|e| HealthError::Config(format!("{}='{}': {}", key, raw, e))),
        Err(_) => Ok(default),
    }
}

/// Parse `SYMBOL:token:feed` entries separated by commas
fn parse_oracle_feeds(raw: &str) -> Result<Vec<OracleFeed>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            let [symbol, token, feed] = parts.as_slice() else {
                return Err(HealthError::Config(format!(
                    "ORACLE_FEEDS entry '{}' is not SYMBOL:token:feed",
                    entry
                )));
            };
            let token = Address::from_str(token)
                .map_err(|e| HealthError::Config(format!("ORACLE_FEEDS token '{}': {}", token, e)))?;
            let feed = Address::from_str(feed)
                .map_err(|e| HealthError::Config(format!("ORACLE_FEEDS feed '{}': {}", feed, e)))?;
            Ok(OracleFeed::new(symbol, token, feed))
        })
        .collect()
}

// ============================================
// TESTS
// ============================================
