use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_LENGTH_WIDTH, MAX_TAG_WIDTH, PNG_LENGTH_WIDTH, PNG_PREAMBLE_LEN, PNG_TAG_WIDTH,
    PNG_TRAILER_WIDTH,
};
use crate::source::ByteSource;
use crate::types::StreamError;
use crate::view::BoundedView;

/// Chunk layout of a container.
///
/// ```text
/// preamble | len (BE) | tag | payload (len bytes) | trailer | len | tag | ...
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerProfile {
    /// Bytes skipped before the first chunk.
    pub preamble_len: u64,
    /// Width of the big-endian unsigned length field.
    pub length_width: usize,
    /// Width of the type tag following the length field.
    pub tag_width: usize,
    /// Bytes after the payload that belong to the chunk (e.g. a CRC).
    pub trailer_width: usize,
}

impl ContainerProfile {
    pub const fn new(
        preamble_len: u64,
        length_width: usize,
        tag_width: usize,
        trailer_width: usize,
    ) -> Self {
        Self {
            preamble_len,
            length_width,
            tag_width,
            trailer_width,
        }
    }

    /// PNG: 8-byte signature, u32 length, 4-byte type, 4-byte CRC.
    pub const fn png() -> Self {
        Self::new(
            PNG_PREAMBLE_LEN,
            PNG_LENGTH_WIDTH,
            PNG_TAG_WIDTH,
            PNG_TRAILER_WIDTH,
        )
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.length_width == 0 || self.length_width > MAX_LENGTH_WIDTH {
            return Err(StreamError::InvalidProfile(format!(
                "length_width must be 1..={MAX_LENGTH_WIDTH}, got {}",
                self.length_width
            )));
        }
        if self.tag_width > MAX_TAG_WIDTH {
            return Err(StreamError::InvalidProfile(format!(
                "tag_width must be <= {MAX_TAG_WIDTH}, got {}",
                self.tag_width
            )));
        }
        Ok(())
    }

    /// Bytes read per chunk: length field + tag.
    pub const fn prefix_len(&self) -> usize {
        self.length_width + self.tag_width
    }

    /// Total chunk size for a declared payload length; `None` on overflow.
    pub fn chunk_span(&self, declared_length: u64) -> Option<u64> {
        (self.prefix_len() as u64)
            .checked_add(declared_length)?
            .checked_add(self.trailer_width as u64)
    }
}

impl Default for ContainerProfile {
    fn default() -> Self {
        Self::png()
    }
}

/// Chunk type identifier, stored inline.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    bytes: [u8; MAX_TAG_WIDTH],
    len: u8,
}

impl TypeTag {
    pub fn new(raw: &[u8]) -> Result<Self, StreamError> {
        if raw.len() > MAX_TAG_WIDTH {
            return Err(StreamError::InvalidProfile(format!(
                "type tag of {} bytes exceeds {MAX_TAG_WIDTH}",
                raw.len()
            )));
        }
        let mut bytes = [0u8; MAX_TAG_WIDTH];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self {
            bytes,
            len: raw.len() as u8,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Printable ASCII tags such as `IHDR`.
    pub fn is_ascii(&self) -> bool {
        self.as_bytes().iter().all(|b| b.is_ascii_graphic())
    }
}

impl PartialEq<[u8]> for TypeTag {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for TypeTag {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.as_bytes() == other.as_slice()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ascii() {
            f.write_str(&String::from_utf8_lossy(self.as_bytes()))
        } else {
            write!(f, "0x")?;
            for b in self.as_bytes() {
                write!(f, "{b:02x}")?;
            }
            Ok(())
        }
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({self})")
    }
}

/// One chunk located by the walker.
///
/// `view` spans length field + tag + payload + trailer. Nothing past the
/// header has been read from the source.
#[derive(Debug, Clone)]
pub struct Chunk<S> {
    pub offset: u64,
    pub declared_length: u64,
    pub type_tag: TypeTag,
    pub view: BoundedView<S>,
    pub profile: ContainerProfile,
}

impl<S: ByteSource + Clone> Chunk<S> {
    /// Total bytes covered by the chunk.
    pub fn span(&self) -> u64 {
        self.view.len()
    }

    /// Offset of the chunk that follows this one.
    pub fn next_offset(&self) -> u64 {
        self.offset + self.span()
    }

    /// Payload only, without header, tag, or trailer.
    pub fn payload(&self) -> Result<BoundedView<S>, StreamError> {
        self.view
            .slice(self.profile.prefix_len() as u64, self.declared_length)
    }

    /// Trailer only (empty for profiles without one).
    pub fn trailer(&self) -> Result<BoundedView<S>, StreamError> {
        let start = self.profile.prefix_len() as u64 + self.declared_length;
        self.view.slice(start, self.profile.trailer_width as u64)
    }

    pub fn into_view(self) -> BoundedView<S> {
        self.view
    }

    pub fn index_entry(&self) -> ChunkIndexEntry {
        ChunkIndexEntry {
            type_tag: self.type_tag,
            offset: self.offset,
            declared_length: self.declared_length,
        }
    }

    /// Convenience: one-line human readable description.
    pub fn summary(&self) -> String {
        format!(
            "chunk '{}' ({} bytes) @ {}",
            self.type_tag, self.declared_length, self.offset
        )
    }
}

/// Boundary record without a view, for building chunk tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkIndexEntry {
    pub type_tag: TypeTag,
    pub offset: u64,
    pub declared_length: u64,
}
