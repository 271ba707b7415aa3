use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use watch_core::Direction;

/// Daemon configuration, read from a JSON file. A missing file means
/// defaults; a present but malformed file is an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchConfig {
    /// Symbols polled every tick.
    pub symbols: Vec<String>,
    pub poll_interval_secs: u64,
    /// Upper bound on Active conditions per symbol when seeding.
    pub max_active_alerts: usize,
    pub max_history_records: usize,
    /// Analysis reports are logged every this many ticks.
    pub report_every_ticks: u64,
    pub data_dir: PathBuf,
    /// Conditions seeded into an empty registry at startup.
    pub alerts: Vec<AlertSpec>,
    /// Canned price series for the replay feed, per symbol.
    pub replay_series: HashMap<String, Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertSpec {
    pub symbol: String,
    pub threshold: f64,
    pub direction: Direction,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            symbols: ["BTC", "ETH", "ADA", "SOL", "DOGE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            poll_interval_secs: 300,
            max_active_alerts: 50,
            max_history_records: 1000,
            report_every_ticks: 12,
            data_dir: PathBuf::from("data"),
            alerts: Vec::new(),
            replay_series: HashMap::new(),
        }
    }
}

impl WatchConfig {
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let config = serde_json::from_slice(&bytes)?;
                tracing::info!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
