use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use watch_core::{AlertCondition, Sample, SampleStore, StoreError};

use crate::DEFAULT_MAX_RECORDS;

/// File-backed sample history: one JSON document mapping symbol to its
/// sample list, rewritten on every append.
///
/// Coarse but durable — the whole map is read, mutated, and written back
/// under an internal mutex, which also gives readers a consistent window.
/// A missing file is an empty history; anything else (I/O, bad JSON)
/// surfaces as a `StoreError`.
pub struct JsonFileStore {
    path: PathBuf,
    max_records: usize,
    lock: Mutex<()>,
}

type HistoryMap = HashMap<String, Vec<Sample>>;

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_max_records(path, DEFAULT_MAX_RECORDS)
    }

    pub fn with_max_records(path: impl Into<PathBuf>, max_records: usize) -> Self {
        Self {
            path: path.into(),
            max_records,
            lock: Mutex::new(()),
        }
    }

    async fn read_map(&self) -> Result<HistoryMap, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HistoryMap::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn write_map(&self, map: &HistoryMap) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let bytes = serde_json::to_vec_pretty(map)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl SampleStore for JsonFileStore {
    async fn append(
        &self,
        symbol: &str,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let mut map = self.read_map().await?;
        let history = map.entry(symbol.to_string()).or_default();
        history.push(Sample::new(price, timestamp));
        if history.len() > self.max_records {
            let excess = history.len() - self.max_records;
            history.drain(..excess);
        }

        self.write_map(&map).await
    }

    async fn recent(&self, symbol: &str, limit: usize) -> Result<Vec<Sample>, StoreError> {
        let _guard = self.lock.lock().await;

        let map = self.read_map().await?;
        let Some(history) = map.get(symbol) else {
            return Ok(Vec::new());
        };
        let start = history.len().saturating_sub(limit);
        Ok(history[start..].to_vec())
    }
}

/// Persists the alert registry's condition snapshot as a JSON array,
/// the interchange format for restoring registry state across restarts.
pub struct JsonConditionStore {
    path: PathBuf,
}

impl JsonConditionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save(&self, conditions: &[AlertCondition]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let bytes = serde_json::to_vec_pretty(conditions)?;
        tokio::fs::write(&self.path, bytes).await?;
        tracing::debug!(count = conditions.len(), path = %self.path.display(), "saved alert conditions");
        Ok(())
    }

    /// A missing snapshot file means a fresh start, not a failure.
    pub async fn load(&self) -> Result<Vec<AlertCondition>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let conditions: Vec<AlertCondition> = serde_json::from_slice(&bytes)?;
                tracing::debug!(count = conditions.len(), "loaded alert conditions");
                Ok(conditions)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watch_core::{ConditionState, Direction};

    #[tokio::test]
    async fn history_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("price_history.json"));

        let now = Utc::now();
        store.append("BTC", 100.0, now).await.unwrap();
        store
            .append("BTC", 101.0, now + chrono::Duration::minutes(1))
            .await
            .unwrap();
        store.append("ETH", 2000.0, now).await.unwrap();

        let btc = store.recent("BTC", 10).await.unwrap();
        assert_eq!(btc.len(), 2);
        assert_eq!(btc.last().unwrap().price, 101.0);
        assert_eq!(store.recent("ETH", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nothing_here.json"));
        assert!(store.recent("BTC", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price_history.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.recent("BTC", 10).await.is_err());
    }

    #[tokio::test]
    async fn retention_cap_applies_per_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::with_max_records(dir.path().join("h.json"), 2);

        let now = Utc::now();
        for i in 0..4 {
            store
                .append("BTC", i as f64, now + chrono::Duration::minutes(i))
                .await
                .unwrap();
        }

        let history = store.recent("BTC", 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.first().unwrap().price, 2.0);
    }

    #[tokio::test]
    async fn condition_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConditionStore::new(dir.path().join("alerts.json"));

        let mut triggered = AlertCondition::new("BTC", 50000.0, Direction::Above).unwrap();
        triggered.mark_triggered(Utc::now());
        let active = AlertCondition::new("ETH", 1500.0, Direction::Below).unwrap();

        store
            .save(&[triggered.clone(), active.clone()])
            .await
            .unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], triggered);
        assert_eq!(loaded[0].state, ConditionState::Triggered);
        assert_eq!(loaded[1], active);
    }

    #[tokio::test]
    async fn missing_snapshot_is_fresh_start() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConditionStore::new(dir.path().join("alerts.json"));
        assert!(store.load().await.unwrap().is_empty());
    }
}
