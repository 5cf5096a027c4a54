//! chunkstream-core
//!
//! Lazy chunk walking and stream composition over borrowed byte sources.
//! Payloads are never loaded unless a caller reads a view.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod source;
pub mod view;
pub mod telemetry;

// Layers
pub mod container;
pub mod compose;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compose::{copy_n, pipe, spawn_producer, Concat, FanOut, PipeReader, PipeWriter};
    pub use crate::container::{Chunk, ChunkWalker, ContainerProfile, TypeTag};
    pub use crate::source::{open_source, ByteSource, InputSource, SeekSource};
    pub use crate::types::StreamError;
    pub use crate::view::BoundedView;
}
