//! The four raw measures behind the health score
//!
//! Each collector fans out its own sub-queries and joins them; any failure
//! aborts the measure, except holder collection which degrades to zero.

mod holders;
mod market_cap;
mod transactions;
mod tvl;

pub use holders::HolderCollector;
pub use market_cap::MarketCapCollector;
pub use transactions::{TrackedEvent, TransactionCollector};
pub use tvl::TvlCollector;
