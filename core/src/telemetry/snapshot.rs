//! telemetry/snapshot.rs
//! Immutable telemetry snapshot.

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::{PipeCounters, WalkCounters};

/// Frozen counters plus derived ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub walk: WalkCounters,
    pub pipe: PipeCounters,
    /// Fraction of the walked span that was actually read (headers only).
    pub read_ratio: f64,
    /// Bytes still in flight (sent but not yet received).
    pub pipe_backlog: u64,
}

impl TelemetrySnapshot {
    pub fn from(walk: &WalkCounters, pipe: &PipeCounters) -> Self {
        let walked = walk.header_bytes_read + walk.bytes_skipped;
        let read_ratio = if walked > 0 {
            walk.header_bytes_read as f64 / walked as f64
        } else {
            0.0
        };

        Self {
            walk: walk.clone(),
            pipe: pipe.clone(),
            read_ratio,
            pipe_backlog: pipe.bytes_sent.saturating_sub(pipe.bytes_received),
        }
    }

    pub fn from_walk(walk: &WalkCounters) -> Self {
        Self::from(walk, &PipeCounters::default())
    }

    pub fn from_pipe(pipe: &PipeCounters) -> Self {
        Self::from(&WalkCounters::default(), pipe)
    }
}
