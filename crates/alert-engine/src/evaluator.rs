use std::sync::Arc;

use chrono::Utc;

use watch_core::AlertCondition;

use crate::AlertRegistry;

/// Applies incoming samples to the registered conditions for a symbol.
///
/// Each triggered condition transitions Active -> Triggered exactly once;
/// a Triggered condition never re-fires, whatever prices follow.
pub struct AlertEvaluator {
    registry: Arc<AlertRegistry>,
}

impl AlertEvaluator {
    pub fn new(registry: Arc<AlertRegistry>) -> Self {
        Self { registry }
    }

    /// Evaluates one price sample against every Active condition for
    /// `symbol`, returning the newly triggered conditions in registry
    /// order. No matching conditions is success with an empty result.
    ///
    /// The whole pass runs under the symbol's registry lock, so
    /// overlapping calls for the same symbol are serialized and the
    /// transition is never observed half-applied.
    pub fn evaluate(&self, symbol: &str, price: f64) -> Vec<AlertCondition> {
        let Some(mut entry) = self.registry.symbol_entry(symbol) else {
            return Vec::new();
        };

        let now = Utc::now();
        let mut triggered = Vec::new();

        for condition in entry.value_mut().iter_mut() {
            if !condition.is_active() || !condition.crossed_by(price) {
                continue;
            }
            condition.mark_triggered(now);
            tracing::info!(
                symbol,
                price,
                threshold = condition.threshold,
                direction = ?condition.direction,
                id = %condition.id,
                "alert triggered"
            );
            triggered.push(condition.clone());
        }

        triggered
    }
}
