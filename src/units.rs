//! Raw on-chain integers to decimal amounts

use alloy_primitives::utils::{format_units, ParseUnits};
use alloy_primitives::U256;

use crate::error::{HealthError, Result};

/// Decimals of the governance token.
///
/// Never queried on-chain; every governance-token amount (swap quote, vault
/// balance, total supply) is scaled by this. Fragile if the token is ever
/// redeployed with a different precision.
pub const GOVERNANCE_TOKEN_DECIMALS: u8 = 18;

/// One whole governance/reference unit in smallest units (10^18)
pub fn one_unit() -> U256 {
    U256::from(10u64).pow(U256::from(GOVERNANCE_TOKEN_DECIMALS))
}

/// `raw / 10^decimals` as f64
pub fn to_decimal<T: Into<ParseUnits>>(raw: T, decimals: u8) -> Result<f64> {
    let formatted = format_units(raw, decimals)
        .map_err(|e| HealthError::Conversion(format!("{} decimals: {}", decimals, e)))?;

    formatted
        .parse::<f64>()
        .map_err(|e| HealthError::Conversion(format!("'{}': {}", formatted, e)))
}
