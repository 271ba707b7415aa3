use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use watch_core::{FeedError, PriceFeed};

/// Deterministic feed that replays canned per-symbol price series,
/// wrapping around at the end. Stands in for a live market feed during
/// dry-runs and tests.
pub struct ReplayFeed {
    series: DashMap<String, (Vec<f64>, usize)>,
}

impl ReplayFeed {
    pub fn new(series: HashMap<String, Vec<f64>>) -> Self {
        let frames = DashMap::new();
        for (symbol, prices) in series {
            frames.insert(symbol, (prices, 0));
        }
        Self { series: frames }
    }
}

#[async_trait]
impl PriceFeed for ReplayFeed {
    async fn latest_price(&self, symbol: &str) -> Result<f64, FeedError> {
        let mut entry = self
            .series
            .get_mut(symbol)
            .ok_or_else(|| FeedError::UnknownSymbol(symbol.to_string()))?;
        let (prices, cursor) = entry.value_mut();
        if prices.is_empty() {
            return Err(FeedError::UnknownSymbol(symbol.to_string()));
        }
        let price = prices[*cursor % prices.len()];
        *cursor += 1;
        Ok(price)
    }
}
