//! Error taxonomy for the scoring pipeline
//!
//! Every failure is fatal to `compute_score()` except inside the holder
//! collector, which degrades to a zero count.

use alloy_primitives::Address;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HealthError>;

#[derive(Debug, Error)]
pub enum HealthError {
    /// The token has no price feed in the oracle map
    #[error("no price feed configured for token {token:?}")]
    UnknownOracle { token: Address },

    /// A contract read failed (transport, revert, decode or timeout)
    #[error("chain query {call} on {contract:?} failed: {message}")]
    ChainQuery {
        call: &'static str,
        contract: Address,
        message: String,
    },

    /// The indexing API failed (HTTP, envelope error, decode or timeout)
    #[error("index query {endpoint} failed: {message}")]
    IndexQuery { endpoint: String, message: String },

    #[error("unit conversion failed: {0}")]
    Conversion(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HealthError {
    pub fn chain(call: &'static str, contract: Address, message: impl ToString) -> Self {
        HealthError::ChainQuery {
            call,
            contract,
            message: message.to_string(),
        }
    }

    pub fn index(endpoint: impl Into<String>, message: impl ToString) -> Self {
        HealthError::IndexQuery {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }
}
