use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{FeedError, NotificationError, Sample, StoreError, TriggerEvent};

/// Append-only per-symbol sample history with bounded retention.
///
/// Implementations may be slow (disk, network); the engine never holds
/// internal locks across these calls.
#[async_trait]
pub trait SampleStore: Send + Sync {
    async fn append(
        &self,
        symbol: &str,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// The most recent samples for `symbol`, oldest first, at most `limit`
    /// entries. An unknown symbol yields an empty sequence, never an error.
    async fn recent(&self, symbol: &str, limit: usize) -> Result<Vec<Sample>, StoreError>;
}

/// A delivery channel for triggered-condition events. Delivery is
/// best-effort; the alert core neither retries nor waits on outcomes.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, event: &TriggerEvent) -> Result<(), NotificationError>;
    fn name(&self) -> &str;
}

/// Source of current prices, polled by the sampling loop.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn latest_price(&self, symbol: &str) -> Result<f64, FeedError>;
}
