pub mod json;
pub mod memory;

pub use json::{JsonConditionStore, JsonFileStore};
pub use memory::MemorySampleStore;

/// Default per-symbol retention cap shared by both stores.
pub const DEFAULT_MAX_RECORDS: usize = 1000;
