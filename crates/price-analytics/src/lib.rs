pub mod engine;
pub mod stats;

#[cfg(test)]
mod stats_tests;

pub use engine::*;
pub use stats::*;
