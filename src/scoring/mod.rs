//! Weighted, capped blend of the four measures into one score in [0, 1]

mod aggregator;
mod weights;

pub use aggregator::{RawMeasures, ScoreAggregator, ScoreReport};
pub use weights::{round_score, score_measures, Metric, MetricWeight, WeightedMetric, SCORE_DECIMALS};
