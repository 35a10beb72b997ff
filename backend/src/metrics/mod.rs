//! Counters and measures
//!
//! Counters are plain named accumulators held in an explicit registry that is
//! built once per model. Measures are read-only queries over that registry.

pub mod counters;
pub mod measures;

pub use counters::{CounterId, CounterRegistry, CounterSet};
pub use measures::Measures;
