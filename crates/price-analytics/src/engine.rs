use std::sync::Arc;

use chrono::Utc;

use watch_core::{AnalysisReport, PriceChange, SampleStore, StoreError, Trend, Volatility};

use crate::stats;

/// Default periods used by `report`, matching the sampling cadence the
/// watcher runs at.
pub const MOVING_AVERAGE_PERIODS: usize = 20;
pub const TREND_PERIODS: usize = 10;
pub const VOLATILITY_PERIODS: usize = 20;
/// How many retained samples a percent-change scan may look back over.
pub const CHANGE_SCAN_LIMIT: usize = 1000;

/// Stateless analytics over a symbol's retained sample history.
///
/// Every call reads the store fresh; insufficient data during warm-up is
/// an expected steady state and comes back as `Ok(None)` (or
/// `Trend::InsufficientData`), while a store failure always propagates.
pub struct StatisticsEngine {
    store: Arc<dyn SampleStore>,
}

impl StatisticsEngine {
    pub fn new(store: Arc<dyn SampleStore>) -> Self {
        Self { store }
    }

    /// Mean of the last `periods` prices; None until `periods` samples
    /// have been retained.
    pub async fn moving_average(
        &self,
        symbol: &str,
        periods: usize,
    ) -> Result<Option<f64>, StoreError> {
        let history = self.store.recent(symbol, periods).await?;
        Ok(stats::moving_average(&history, periods))
    }

    /// Movement between the retained sample closest to `now - hours` and
    /// the most recent sample. Equidistant candidates resolve to the
    /// earlier sample.
    pub async fn percent_change(
        &self,
        symbol: &str,
        hours: i64,
    ) -> Result<Option<PriceChange>, StoreError> {
        let history = self.store.recent(symbol, CHANGE_SCAN_LIMIT).await?;
        Ok(stats::percent_change(&history, Utc::now(), hours))
    }

    pub async fn trend(&self, symbol: &str, periods: usize) -> Result<Trend, StoreError> {
        let history = self.store.recent(symbol, periods).await?;
        Ok(stats::trend(&history))
    }

    pub async fn volatility(
        &self,
        symbol: &str,
        periods: usize,
    ) -> Result<Option<Volatility>, StoreError> {
        let history = self.store.recent(symbol, periods).await?;
        Ok(stats::volatility(&history))
    }

    /// Full report for one symbol. Sub-computations are independent —
    /// any of them may be unavailable without failing the others — but a
    /// symbol with no history at all yields None rather than an empty
    /// shell of a report.
    pub async fn report(&self, symbol: &str) -> Result<Option<AnalysisReport>, StoreError> {
        let latest = self.store.recent(symbol, 1).await?;
        let Some(current) = latest.last() else {
            tracing::debug!(symbol, "no sample history, report unavailable");
            return Ok(None);
        };

        let moving_average_20 = self.moving_average(symbol, MOVING_AVERAGE_PERIODS).await?;
        let change_24h = self.percent_change(symbol, 24).await?;
        let change_7d = self.percent_change(symbol, 168).await?;
        let trend = self.trend(symbol, TREND_PERIODS).await?;
        let volatility = self.volatility(symbol, VOLATILITY_PERIODS).await?;

        Ok(Some(AnalysisReport {
            symbol: symbol.to_string(),
            current_price: Some(current.price),
            moving_average_20,
            change_24h,
            change_7d,
            trend,
            volatility,
            generated_at: Utc::now(),
        }))
    }
}
