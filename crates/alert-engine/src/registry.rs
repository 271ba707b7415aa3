use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use uuid::Uuid;

use watch_core::{AlertCondition, AlertError, Direction};

/// Owns every alert condition, keyed by symbol.
///
/// The DashMap shard lock is what serializes concurrent evaluation for the
/// same symbol while letting different symbols proceed in parallel.
pub struct AlertRegistry {
    conditions: DashMap<String, Vec<AlertCondition>>,
}

impl AlertRegistry {
    pub fn new() -> Self {
        Self {
            conditions: DashMap::new(),
        }
    }

    /// Registers a new Active condition and returns its id.
    ///
    /// Duplicate thresholds for the same symbol are permitted and fire
    /// independently.
    pub fn add(
        &self,
        symbol: &str,
        threshold: f64,
        direction: Direction,
    ) -> Result<Uuid, AlertError> {
        let condition = AlertCondition::new(symbol, threshold, direction)?;
        let id = condition.id;
        self.conditions
            .entry(symbol.to_string())
            .or_default()
            .push(condition);
        tracing::info!(symbol, threshold, ?direction, %id, "alert condition added");
        Ok(id)
    }

    /// Removes the condition with `id`. Returns false if no such condition
    /// exists, which is not an error.
    pub fn remove(&self, id: Uuid) -> bool {
        for mut entry in self.conditions.iter_mut() {
            let list = entry.value_mut();
            if let Some(pos) = list.iter().position(|c| c.id == id) {
                list.remove(pos);
                tracing::info!(%id, "alert condition removed");
                return true;
            }
        }
        false
    }

    /// Snapshot of every Active condition.
    pub fn active(&self) -> Vec<AlertCondition> {
        self.conditions
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|c| c.is_active())
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Snapshot of every condition, Triggered ones included.
    pub fn all(&self) -> Vec<AlertCondition> {
        self.conditions
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of Active conditions for one symbol.
    pub fn active_for(&self, symbol: &str) -> usize {
        self.conditions
            .get(symbol)
            .map(|list| list.iter().filter(|c| c.is_active()).count())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.conditions.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The persisted-snapshot surface: same contents as `all`, named for
    /// the persistence round-trip.
    pub fn snapshot(&self) -> Vec<AlertCondition> {
        self.all()
    }

    /// Replaces any conditions for the affected symbols with a previously
    /// persisted snapshot.
    pub fn restore(&self, conditions: Vec<AlertCondition>) {
        for condition in conditions {
            self.conditions
                .entry(condition.symbol.clone())
                .or_default()
                .push(condition);
        }
    }

    /// Exclusive access to one symbol's conditions, used by the evaluator.
    /// Holding the guard blocks other writers of the same shard.
    pub(crate) fn symbol_entry(&self, symbol: &str) -> Option<RefMut<'_, String, Vec<AlertCondition>>> {
        self.conditions.get_mut(symbol)
    }
}

impl Default for AlertRegistry {
    fn default() -> Self {
        Self::new()
    }
}
