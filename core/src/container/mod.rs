//! Chunked container walking.
//!
//! Responsibilities:
//! - Describe a length-prefixed chunk layout (`ContainerProfile`)
//! - Locate chunk boundaries by reading headers only
//! - Hand back lazy `BoundedView`s over each chunk
//!
//! Non-responsibilities:
//! - Checksum verification
//! - Chunk-type semantics
//! - Reading payloads

pub mod types;
pub mod walker;

pub use types::{Chunk, ChunkIndexEntry, ContainerProfile, TypeTag};
pub use walker::{ChunkWalker, WalkerState};
