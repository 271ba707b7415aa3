use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use watch_core::{Sample, SampleStore, StoreError};

use crate::DEFAULT_MAX_RECORDS;

/// In-memory sample history with bounded per-symbol retention.
///
/// Appends and reads for one symbol go through the same shard lock, so a
/// `recent` call always sees a consistent window, never a torn append.
pub struct MemorySampleStore {
    histories: DashMap<String, Vec<Sample>>,
    max_records: usize,
}

impl MemorySampleStore {
    pub fn new() -> Self {
        Self::with_max_records(DEFAULT_MAX_RECORDS)
    }

    pub fn with_max_records(max_records: usize) -> Self {
        Self {
            histories: DashMap::new(),
            max_records,
        }
    }

    pub fn sample_count(&self, symbol: &str) -> usize {
        self.histories.get(symbol).map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for MemorySampleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SampleStore for MemorySampleStore {
    async fn append(
        &self,
        symbol: &str,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut history = self.histories.entry(symbol.to_string()).or_default();
        history.push(Sample::new(price, timestamp));
        if history.len() > self.max_records {
            let excess = history.len() - self.max_records;
            history.drain(..excess);
        }
        Ok(())
    }

    async fn recent(&self, symbol: &str, limit: usize) -> Result<Vec<Sample>, StoreError> {
        let Some(entry) = self.histories.get(symbol) else {
            return Ok(Vec::new());
        };
        let history = entry.value();
        let start = history.len().saturating_sub(limit);
        Ok(history[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recent_is_most_recent_last() {
        let store = MemorySampleStore::new();
        let now = Utc::now();
        for i in 0..5 {
            store
                .append("BTC", 100.0 + i as f64, now + chrono::Duration::minutes(i))
                .await
                .unwrap();
        }

        let recent = store.recent("BTC", 3).await.unwrap();
        let prices: Vec<f64> = recent.iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![102.0, 103.0, 104.0]);
    }

    #[tokio::test]
    async fn unknown_symbol_is_empty_not_error() {
        let store = MemorySampleStore::new();
        assert!(store.recent("NOPE", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn retention_cap_drops_oldest() {
        let store = MemorySampleStore::with_max_records(3);
        let now = Utc::now();
        for i in 0..5 {
            store
                .append("BTC", i as f64, now + chrono::Duration::minutes(i))
                .await
                .unwrap();
        }

        assert_eq!(store.sample_count("BTC"), 3);
        let recent = store.recent("BTC", 10).await.unwrap();
        assert_eq!(recent.first().unwrap().price, 2.0);
        assert_eq!(recent.last().unwrap().price, 4.0);
    }

    #[tokio::test]
    async fn limit_larger_than_history_returns_everything() {
        let store = MemorySampleStore::new();
        store.append("ETH", 1.0, Utc::now()).await.unwrap();
        assert_eq!(store.recent("ETH", 100).await.unwrap().len(), 1);
    }
}
