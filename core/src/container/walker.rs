use std::iter::FusedIterator;

use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace, warn};

use crate::constants::{MAX_LENGTH_WIDTH, MAX_TAG_WIDTH};
use crate::container::types::{Chunk, ChunkIndexEntry, ContainerProfile, TypeTag};
use crate::source::ByteSource;
use crate::telemetry::{TelemetrySnapshot, WalkCounters};
use crate::types::StreamError;
use crate::view::BoundedView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerState {
    /// Offset sits at the start of a chunk header.
    Positioned,
    /// End-of-source reached or a malformed chunk was met. Terminal.
    Exhausted,
}

/// Forward-only, non-restartable walk over the chunks of a container.
///
/// Per chunk the walker reads the length field and tag only, then steps the
/// offset past payload and trailer. Memory use does not depend on chunk size.
#[derive(Debug)]
pub struct ChunkWalker<S> {
    source: S,
    profile: ContainerProfile,
    total_len: u64,
    offset: u64,
    state: WalkerState,
    counters: WalkCounters,
}

impl<S: ByteSource + Clone> ChunkWalker<S> {
    /// Position a walker on the first chunk after the preamble.
    /// The preamble is skipped, not validated.
    pub fn new(source: S, profile: ContainerProfile) -> Result<Self, StreamError> {
        profile.validate()?;
        let total_len = source.total_len()?;

        if total_len < profile.preamble_len {
            return Err(StreamError::TruncatedContainer {
                offset: 0,
                needed: profile.preamble_len,
                available: total_len,
            });
        }

        debug!(
            "[WALKER] start: total_len={total_len}, preamble={}, profile={profile:?}",
            profile.preamble_len
        );

        Ok(Self {
            source,
            profile,
            total_len,
            offset: profile.preamble_len,
            state: WalkerState::Positioned,
            counters: WalkCounters::default(),
        })
    }

    /// Walker with the PNG profile.
    pub fn png(source: S) -> Result<Self, StreamError> {
        Self::new(source, ContainerProfile::png())
    }

    /// Offset of the next header to read. After a truncation error this is
    /// still the start of the malformed chunk.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn state(&self) -> WalkerState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == WalkerState::Exhausted
    }

    pub fn profile(&self) -> &ContainerProfile {
        &self.profile
    }

    pub fn counters(&self) -> &WalkCounters {
        &self.counters
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from_walk(&self.counters)
    }

    /// Locate the next chunk.
    ///
    /// - `Ok(Some(chunk))`: chunk emitted, offset moved past it
    /// - `Ok(None)`: clean end at a chunk boundary, or already exhausted
    /// - `Err(TruncatedContainer)`: partial header or body past end-of-source
    pub fn next_chunk(&mut self) -> Result<Option<Chunk<S>>, StreamError> {
        if self.state == WalkerState::Exhausted {
            return Ok(None);
        }

        let result = self.step();
        if !matches!(result, Ok(Some(_))) {
            self.state = WalkerState::Exhausted;
        }
        result
    }

    fn step(&mut self) -> Result<Option<Chunk<S>>, StreamError> {
        let prefix_len = self.profile.prefix_len();
        let length_width = self.profile.length_width;

        let mut scratch = [0u8; MAX_LENGTH_WIDTH + MAX_TAG_WIDTH];
        let header = &mut scratch[..prefix_len];
        let got = self.source.read_full_at(self.offset, header)?;

        if got == 0 {
            debug!(
                "[WALKER] end of container at {} after {} chunks",
                self.offset, self.counters.chunks
            );
            return Ok(None);
        }

        if got < prefix_len {
            self.counters.add_header_read(got);
            self.counters.add_truncation();
            warn!(
                "[WALKER] partial header at {}: {got} of {prefix_len} bytes",
                self.offset
            );
            return Err(StreamError::TruncatedContainer {
                offset: self.offset,
                needed: prefix_len as u64,
                available: got as u64,
            });
        }

        let declared_length = BigEndian::read_uint(&header[..length_width], length_width);
        let type_tag = TypeTag::new(&header[length_width..prefix_len])?;
        let available = self.total_len.saturating_sub(self.offset);

        let span = match self.profile.chunk_span(declared_length) {
            Some(span) if span <= available => span,
            span => {
                self.counters.add_header_read(prefix_len);
                self.counters.add_truncation();
                warn!(
                    "[WALKER] chunk '{type_tag}' at {} declares {declared_length} bytes, only {available} remain",
                    self.offset
                );
                return Err(StreamError::TruncatedContainer {
                    offset: self.offset,
                    needed: span.unwrap_or(u64::MAX),
                    available,
                });
            }
        };

        let chunk = Chunk {
            offset: self.offset,
            declared_length,
            type_tag,
            view: BoundedView::new_unchecked(self.source.clone(), self.offset, span),
            profile: self.profile,
        };

        trace!("[WALKER] {}", chunk.summary());
        self.counters
            .add_chunk(prefix_len, span - prefix_len as u64);
        self.offset += span;

        Ok(Some(chunk))
    }

    /// Walk the rest of the container and return its chunk table.
    /// Payloads are never read.
    pub fn collect_index(&mut self) -> Result<Vec<ChunkIndexEntry>, StreamError> {
        let mut index = Vec::new();
        while let Some(chunk) = self.next_chunk()? {
            index.push(chunk.index_entry());
        }
        Ok(index)
    }
}

impl<S: ByteSource + Clone> Iterator for ChunkWalker<S> {
    type Item = Result<Chunk<S>, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

impl<S: ByteSource + Clone> FusedIterator for ChunkWalker<S> {}
