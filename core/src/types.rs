use std::io;

use thiserror::Error;

/// Unified error covering views, container walking, and stream composition.
/// - `From<io::Error>` unwraps errors that crossed an `std::io` trait boundary,
///   so `?` recovers the original variant.
/// - End-of-view and end-of-sequence are not errors; they surface as `Ok(0)` / `Ok(None)`.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Seek or slice outside a bounded view's range.
    #[error("offset {offset} out of range for view of {len} bytes")]
    OutOfRange { offset: i128, len: u64 },

    /// Header or declared chunk body runs past end-of-source.
    #[error("truncated container at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedContainer {
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// Write after the consumer end of a pipe was closed.
    #[error("pipe closed by reader")]
    ClosedPipe,

    /// First failing sink of a fan-out.
    #[error("downstream sink {index} failed: {source}")]
    DownstreamFailure {
        index: usize,
        #[source]
        source: io::Error,
    },

    /// Container profile that cannot describe a chunk layout.
    #[error("invalid container profile: {0}")]
    InvalidProfile(String),

    /// Any other I/O failure from the underlying source or sink.
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl StreamError {
    /// The `io::ErrorKind` used when this error crosses into `std::io` traits.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            StreamError::OutOfRange { .. } => io::ErrorKind::InvalidInput,
            StreamError::TruncatedContainer { .. } => io::ErrorKind::UnexpectedEof,
            StreamError::ClosedPipe => io::ErrorKind::BrokenPipe,
            StreamError::DownstreamFailure { source, .. } => source.kind(),
            StreamError::InvalidProfile(_) => io::ErrorKind::InvalidInput,
            StreamError::Io(e) => e.kind(),
        }
    }
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        // Recover our own variant if it was boxed into an io::Error on the way out
        match e.downcast::<StreamError>() {
            Ok(ours) => ours,
            Err(e) => StreamError::Io(e),
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Io(inner) => inner,
            other => io::Error::new(other.io_kind(), other),
        }
    }
}
