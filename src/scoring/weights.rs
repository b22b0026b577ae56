use serde::Serialize;
use std::fmt;

/// Decimal places kept in the final score
pub const SCORE_DECIMALS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Tvl,
    Cap,
    Holders,
    Txs,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Tvl, Metric::Cap, Metric::Holders, Metric::Txs];

    /// Fixed weight/cap table. Weights sum to 1.0.
    pub fn weight(&self) -> MetricWeight {
        match self {
            Metric::Tvl => MetricWeight { weight: 0.4, expected_max: 10_000_000.0 },
            Metric::Cap => MetricWeight { weight: 0.4, expected_max: 15_000_000.0 },
            Metric::Holders => MetricWeight { weight: 0.1, expected_max: 20_000.0 },
            Metric::Txs => MetricWeight { weight: 0.1, expected_max: 50_000.0 },
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Tvl => write!(f, "TVL"),
            Metric::Cap => write!(f, "CAP"),
            Metric::Holders => write!(f, "HOLDERS"),
            Metric::Txs => write!(f, "TXS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricWeight {
    pub weight: f64,
    pub expected_max: f64,
}

/// One raw measure paired with its weight and cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightedMetric {
    pub metric: Metric,
    pub raw_value: f64,
    pub weight: f64,
    pub expected_max: f64,
}

impl WeightedMetric {
    pub fn new(metric: Metric, raw_value: f64) -> Self {
        let MetricWeight { weight, expected_max } = metric.weight();
        Self {
            metric,
            raw_value,
            weight,
            expected_max,
        }
    }

    /// Uncapped `raw * weight / expected_max`
    pub fn rate(&self) -> f64 {
        self.raw_value * self.weight / self.expected_max
    }

    /// Rate capped at the weight; always within [0, weight]
    pub fn contribution(&self) -> f64 {
        self.rate().clamp(0.0, self.weight)
    }
}

/// Half away from zero to `SCORE_DECIMALS` places
pub fn round_score(value: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (value * factor).round() / factor
}

/// Weighted metrics for `(tvl, cap, holders, txs)` and the rounded score
pub fn score_measures(tvl: f64, cap: f64, holders: u64, txs: u64) -> (Vec<WeightedMetric>, f64) {
    let metrics = vec![
        WeightedMetric::new(Metric::Tvl, tvl),
        WeightedMetric::new(Metric::Cap, cap),
        WeightedMetric::new(Metric::Holders, holders as f64),
        WeightedMetric::new(Metric::Txs, txs as f64),
    ];

    let score = round_score(metrics.iter().map(WeightedMetric::contribution).sum());
    (metrics, score)
}
