//! USD prices: direct price feeds, and the governance token priced through
//! its trading pair against the reference asset.

mod oracle;
mod pair;

pub use oracle::{PriceOracleAdapter, PricePoint};
pub use pair::PairPriceResolver;
