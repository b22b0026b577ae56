//! Protocol health score
//!
//! Blends total value locked, governance-token market cap, unique holders
//! and historical deposit/withdraw activity into a single score in [0, 1].
//!
//! ```no_run
//! # async fn run() -> health_score::Result<()> {
//! let config = health_score::Config::from_env()?;
//! let score = health_score::ScoreAggregator::from_config(&config)?
//!     .compute_score()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod collectors;
pub mod config;
pub mod error;
pub mod index;
pub mod pricing;
pub mod scoring;
pub mod units;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{HealthError, Result};
pub use scoring::{ScoreAggregator, ScoreReport};
