//! watcher: price-alert daemon.
//!
//! Polls a price feed for each configured symbol, appends the sample to
//! the history store, evaluates the registered alert conditions, and
//! dispatches every trigger to the configured notification sinks.
//! Analysis reports are logged on a coarser schedule.
//!
//! Usage:
//!   cargo run -p watcher                      # ./pricewatch.json or defaults
//!   cargo run -p watcher -- path/to/config.json

mod config;
mod feed;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use alert_engine::{AlertEvaluator, AlertRegistry};
use notification_service::{Dispatcher, NotificationConfig};
use price_analytics::StatisticsEngine;
use sample_store::{JsonConditionStore, JsonFileStore};
use watch_core::{PriceFeed, SampleStore, TriggerEvent};

use crate::config::WatchConfig;
use crate::feed::ReplayFeed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("pricewatch.json"));
    let config = WatchConfig::load(&config_path).await?;

    let store = Arc::new(JsonFileStore::with_max_records(
        config.data_dir.join("price_history.json"),
        config.max_history_records,
    ));
    let condition_store = JsonConditionStore::new(config.data_dir.join("alerts.json"));

    let registry = Arc::new(AlertRegistry::new());
    registry.restore(condition_store.load().await?);
    if registry.is_empty() {
        seed_alerts(&registry, &config);
        condition_store.save(&registry.snapshot()).await?;
    }
    tracing::info!(
        total = registry.len(),
        active = registry.active().len(),
        "alert registry ready"
    );

    let evaluator = AlertEvaluator::new(registry.clone());
    let statistics = StatisticsEngine::new(store.clone());
    let dispatcher = Dispatcher::from_config(&NotificationConfig::from_env());
    let feed: Arc<dyn PriceFeed> = Arc::new(ReplayFeed::new(config.replay_series.clone()));

    let mut ticker = tokio::time::interval(Duration::from_secs(config.poll_interval_secs.max(1)));
    let report_every = config.report_every_ticks.max(1);
    let mut tick: u64 = 0;

    loop {
        ticker.tick().await;
        tick += 1;

        let mut any_triggered = false;
        for symbol in &config.symbols {
            let price = match feed.latest_price(symbol).await {
                Ok(price) => price,
                Err(e) => {
                    tracing::warn!(symbol = %symbol, "no price this tick: {}", e);
                    continue;
                }
            };

            if let Err(e) = store.append(symbol, price, Utc::now()).await {
                // Retrying is the scheduler's job; the next tick will.
                tracing::error!(symbol = %symbol, "failed to record sample: {}", e);
                continue;
            }

            for condition in evaluator.evaluate(symbol, price) {
                dispatcher
                    .dispatch(&TriggerEvent::new(condition, price))
                    .await;
                any_triggered = true;
            }
        }

        if any_triggered {
            if let Err(e) = condition_store.save(&registry.snapshot()).await {
                tracing::error!("failed to persist alert conditions: {}", e);
            }
        }

        if tick % report_every == 0 {
            for symbol in &config.symbols {
                match statistics.report(symbol).await {
                    Ok(Some(report)) => tracing::info!("\n{}", report),
                    Ok(None) => tracing::debug!(symbol = %symbol, "analysis not yet available"),
                    Err(e) => tracing::error!(symbol = %symbol, "analysis failed: {}", e),
                }
            }
        }
    }
}

/// Registers the configured alert conditions, honoring the per-symbol
/// Active cap. Invalid specs are skipped with a warning rather than
/// aborting startup.
fn seed_alerts(registry: &AlertRegistry, config: &WatchConfig) {
    for spec in &config.alerts {
        if registry.active_for(&spec.symbol) >= config.max_active_alerts {
            tracing::warn!(
                symbol = %spec.symbol,
                cap = config.max_active_alerts,
                "active alert cap reached, skipping condition"
            );
            continue;
        }
        if let Err(e) = registry.add(&spec.symbol, spec.threshold, spec.direction) {
            tracing::warn!(symbol = %spec.symbol, "skipping alert condition: {}", e);
        }
    }
}
