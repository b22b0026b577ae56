use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::weights::{score_measures, WeightedMetric};
use crate::chain::{ChainQuery, RpcChainQuery};
use crate::collectors::{HolderCollector, MarketCapCollector, TransactionCollector, TvlCollector};
use crate::config::Config;
use crate::error::{HealthError, Result};
use crate::index::{CovalentClient, IndexedEventsQuery};
use crate::pricing::{PairPriceResolver, PriceOracleAdapter};

/// The four measures before weighting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawMeasures {
    pub tvl_usd: f64,
    pub market_cap_usd: f64,
    pub holders: u64,
    pub transactions: u64,
}

/// Score plus everything that went into it
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub computed_at: DateTime<Utc>,
    pub measures: RawMeasures,
    pub metrics: Vec<WeightedMetric>,
    pub score: f64,
}

impl ScoreReport {
    pub fn from_measures(measures: RawMeasures) -> Self {
        let (metrics, score) = score_measures(
            measures.tvl_usd,
            measures.market_cap_usd,
            measures.holders,
            measures.transactions,
        );

        Self {
            computed_at: Utc::now(),
            measures,
            metrics,
            score,
        }
    }

    pub fn log_breakdown(&self) {
        for m in &self.metrics {
            info!(
                "  {:<8} raw {:>16.2} | rate {:.5} | contribution {:.5} / {:.2}",
                m.metric.to_string(),
                m.raw_value,
                m.rate(),
                m.contribution(),
                m.weight
            );
        }
    }
}

/// Runs the four collectors concurrently and blends their results
pub struct ScoreAggregator {
    tvl: TvlCollector,
    market_cap: MarketCapCollector,
    holders: HolderCollector,
    transactions: TransactionCollector,
}

impl ScoreAggregator {
    pub fn new(
        tvl: TvlCollector,
        market_cap: MarketCapCollector,
        holders: HolderCollector,
        transactions: TransactionCollector,
    ) -> Self {
        Self {
            tvl,
            market_cap,
            holders,
            transactions,
        }
    }

    /// Wire every collector to the given collaborators. The config is
    /// validated first.
    pub fn with_clients(
        config: &Config,
        chain: Arc<dyn ChainQuery>,
        index: Arc<dyn IndexedEventsQuery>,
    ) -> Result<Self> {
        config.validate()?;

        let oracle = Arc::new(PriceOracleAdapter::from_config(chain.clone(), config));
        let pair = Arc::new(PairPriceResolver::from_config(chain.clone(), oracle.clone(), config));

        Ok(Self::new(
            TvlCollector::from_config(chain.clone(), oracle, pair.clone(), config),
            MarketCapCollector::new(chain, pair, config.contracts.governance_token),
            HolderCollector::from_config(index.clone(), config),
            TransactionCollector::from_config(index, config),
        ))
    }

    /// JSON-RPC chain reads and the HTTP index API
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let chain: Arc<dyn ChainQuery> = Arc::new(RpcChainQuery::from_config(config)?);
        let index: Arc<dyn IndexedEventsQuery> = Arc::new(CovalentClient::from_config(config)?);

        Self::with_clients(config, chain, index)
    }

    /// All four measures; the first failure aborts the rest
    pub async fn collect(&self) -> Result<RawMeasures> {
        let (tvl_usd, market_cap_usd, holders, transactions) = tokio::try_join!(
            self.tvl.total_tvl(),
            self.market_cap.market_cap(),
            async { Ok::<_, HealthError>(self.holders.holders_count().await) },
            self.transactions.total_transactions_count(),
        )?;

        Ok(RawMeasures {
            tvl_usd,
            market_cap_usd,
            holders,
            transactions,
        })
    }

    pub async fn compute_report(&self) -> Result<ScoreReport> {
        let start = Instant::now();

        let report = ScoreReport::from_measures(self.collect().await?);

        info!("🩺 Health score: {:.5} ({:.2?})", report.score, start.elapsed());
        report.log_breakdown();

        Ok(report)
    }

    /// Score in [0, 1], rounded to 5 decimals
    pub async fn compute_score(&self) -> Result<f64> {
        Ok(self.compute_report().await?.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Pagination;
    use crate::testing::{units, FakeChain, FakeIndex};
    use alloy_primitives::U256;

    /// Chain for the default config: WETH $2000 quoting 1 GOV per WETH
    fn chain(config: &Config) -> FakeChain {
        let c = &config.contracts;
        let weth_feed = config.oracle_map()[&c.reference_asset];

        FakeChain::new()
            .with_feed(weth_feed, 2_000)
            .with_amounts_out(vec![units(1, 18), units(1, 18)])
            // Vault: 5,000 GOV → $10M, at the TVL cap
            .with_balance(c.governance_token, c.staked_vault, units(5_000, 18))
            // Supply 3,750 GOV → $7.5M, half the cap max
            .with_supply(c.governance_token, units(3_750, 18))
    }

    fn config() -> Config {
        Config {
            index_api_key: Some("test".to_string()),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_reference_scenario_scores_point_six() {
        let config = config();
        let aggregator = ScoreAggregator::with_clients(&config, Arc::new(chain(&config)), Arc::new(FakeIndex::new())).unwrap();

        let report = aggregator.compute_report().await.unwrap();
        assert!((report.measures.tvl_usd - 10_000_000.0).abs() < 1e-3);
        assert!((report.measures.market_cap_usd - 7_500_000.0).abs() < 1e-3);
        assert_eq!(report.measures.holders, 0);
        assert_eq!(report.measures.transactions, 0);
        assert_eq!(report.score, 0.6);
    }

    #[tokio::test]
    async fn test_all_measures_contribute() {
        let config = config();
        let c = &config.contracts;
        let more = Some(Pagination {
            has_more: true,
            total_count: Some(250),
            ..Pagination::default()
        });
        let index = FakeIndex::new()
            .with_holder_page(c.governance_token, 0, &["0xA", "0xB"], more)
            .with_holder_page(c.governance_token, 1, &["0xC"], None)
            .with_holder_page(c.staked_vault, 0, &["0xc", "0xD"], None)
            .with_event_pages("Deposit", &[200, 200, 100])
            .with_event_pages("Withdraw", &[250])
            .with_event_pages("EmergencyWithdraw", &[]);

        let aggregator = ScoreAggregator::with_clients(&config, Arc::new(chain(&config)), Arc::new(index)).unwrap();
        let report = aggregator.compute_report().await.unwrap();

        assert_eq!(report.measures.holders, 4);
        assert_eq!(report.measures.transactions, 750);
        // 0.4 + 0.2 + 4 * 0.1 / 20000 + 750 * 0.1 / 50000
        assert_eq!(report.score, 0.60152);
    }

    #[tokio::test]
    async fn test_holder_failure_does_not_fail_score() {
        let config = config();
        let index = FakeIndex::new().with_failing_token(config.contracts.staked_vault);

        let aggregator = ScoreAggregator::with_clients(&config, Arc::new(chain(&config)), Arc::new(index)).unwrap();
        assert_eq!(aggregator.compute_score().await.unwrap(), 0.6);
    }

    #[tokio::test]
    async fn test_transaction_failure_fails_score() {
        let config = config();
        let index = FakeIndex::new().with_failing_event("Withdraw");

        let aggregator = ScoreAggregator::with_clients(&config, Arc::new(chain(&config)), Arc::new(index)).unwrap();
        assert!(matches!(
            aggregator.compute_score().await,
            Err(HealthError::IndexQuery { .. })
        ));
    }

    #[tokio::test]
    async fn test_unpriced_pool_fails_score() {
        let config = config();
        let unmapped = alloy_primitives::Address::repeat_byte(0x77);
        let chain = chain(&config)
            .with_decimals(unmapped, 18)
            .with_pool(unmapped, U256::from(1u64));

        let aggregator = ScoreAggregator::with_clients(&config, Arc::new(chain), Arc::new(FakeIndex::new())).unwrap();
        assert!(matches!(
            aggregator.compute_score().await,
            Err(HealthError::UnknownOracle { .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = config();
        config.page_size = 0;
        let result = ScoreAggregator::with_clients(&config, Arc::new(FakeChain::new()), Arc::new(FakeIndex::new()));
        assert!(matches!(result, Err(HealthError::Config(_))));

        let result = ScoreAggregator::with_clients(&Config::default(), Arc::new(FakeChain::new()), Arc::new(FakeIndex::new()));
        assert!(matches!(result, Err(HealthError::Config(_))));
    }

    #[test]
    fn test_report_serializes() {
        let report = ScoreReport::from_measures(RawMeasures {
            tvl_usd: 1_000_000.0,
            market_cap_usd: 0.0,
            holders: 100,
            transactions: 10,
        });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metrics"].as_array().unwrap().len(), 4);
        assert_eq!(json["metrics"][0]["metric"], "Tvl");
        assert!(json["score"].as_f64().unwrap() > 0.0);
    }
}
