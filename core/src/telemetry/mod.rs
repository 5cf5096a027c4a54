//! telemetry/mod.rs
//! Deterministic counters for the walker and the pipe bridge, frozen into
//! immutable snapshots.
//!
//! Counters are owned by a single walker or pipe end, so no atomics or locks.
//! Pipe ends run on different threads; merge their counters after joining.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
