//! telemetry/counters.rs
//! Mutable counters updated while walking a container or moving bytes through a pipe.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Counters collected by a `ChunkWalker`.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkCounters {
    pub chunks: u64,
    /// Length + tag bytes actually read from the source.
    pub header_bytes_read: u64,
    /// Payload + trailer bytes stepped over without reading.
    pub bytes_skipped: u64,
    pub truncations: u64,
}

impl WalkCounters {
    /// Record one emitted chunk.
    pub fn add_chunk(&mut self, header_len: usize, skipped: u64) {
        self.chunks += 1;
        self.header_bytes_read += header_len as u64;
        self.bytes_skipped += skipped;
    }

    /// Record header bytes read for a record that produced no chunk.
    pub fn add_header_read(&mut self, read: usize) {
        self.header_bytes_read += read as u64;
    }

    pub fn add_truncation(&mut self) {
        self.truncations += 1;
    }

    pub fn merge(&mut self, other: &WalkCounters) {
        self.chunks += other.chunks;
        self.header_bytes_read += other.header_bytes_read;
        self.bytes_skipped += other.bytes_skipped;
        self.truncations += other.truncations;
    }
}

impl AddAssign for WalkCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}

/// Counters collected by one end of a pipe.
/// The writer fills the `sent` fields, the reader the `received` fields.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeCounters {
    pub messages_sent: u64,
    pub bytes_sent: u64,
    pub messages_received: u64,
    pub bytes_received: u64,
}

impl PipeCounters {
    pub fn add_sent(&mut self, len: usize) {
        self.messages_sent += 1;
        self.bytes_sent += len as u64;
    }

    pub fn add_received(&mut self, len: usize) {
        self.messages_received += 1;
        self.bytes_received += len as u64;
    }

    pub fn merge(&mut self, other: &PipeCounters) {
        self.messages_sent += other.messages_sent;
        self.bytes_sent += other.bytes_sent;
        self.messages_received += other.messages_received;
        self.bytes_received += other.bytes_received;
    }
}

impl AddAssign for PipeCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
