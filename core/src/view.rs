//! Bounded views: a cursor over a fixed window of a shared source.

use std::io::{self, Read, Seek, SeekFrom};

use bytes::Bytes;

use crate::source::ByteSource;
use crate::types::StreamError;

/// Read-only window `[base_offset, base_offset + len)` over a source.
///
/// The view never copies its range up front; every read is translated to an
/// absolute positioned read on the source. Cloning a view clones the source
/// handle (cheap for `&S` and `Arc<S>`) and the cursor.
#[derive(Debug, Clone)]
pub struct BoundedView<S> {
    source: S,
    base_offset: u64,
    len: u64,
    cursor: u64,
}

impl<S: ByteSource> BoundedView<S> {
    /// View over `len` bytes of `source` starting at `base_offset`.
    /// The range must lie inside the source.
    pub fn new(source: S, base_offset: u64, len: u64) -> Result<Self, StreamError> {
        let total = source.total_len()?;
        match base_offset.checked_add(len) {
            Some(end) if end <= total => Ok(Self::new_unchecked(source, base_offset, len)),
            _ => Err(StreamError::OutOfRange {
                offset: base_offset as i128 + len as i128,
                len: total,
            }),
        }
    }

    /// View over the whole source.
    pub fn whole(source: S) -> Result<Self, StreamError> {
        let total = source.total_len()?;
        Ok(Self::new_unchecked(source, 0, total))
    }

    /// Caller has already checked the range against the source.
    pub(crate) fn new_unchecked(source: S, base_offset: u64, len: u64) -> Self {
        Self {
            source,
            base_offset,
            len,
            cursor: 0,
        }
    }

    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cursor relative to `base_offset`.
    pub fn position(&self) -> u64 {
        self.cursor
    }

    pub fn remaining(&self) -> u64 {
        self.len - self.cursor
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Narrow to `len` bytes starting `offset` bytes into this view.
    /// The sub-view starts with its own cursor at 0.
    pub fn slice(&self, offset: u64, len: u64) -> Result<BoundedView<S>, StreamError>
    where
        S: Clone,
    {
        match offset.checked_add(len) {
            Some(end) if end <= self.len => Ok(BoundedView::new_unchecked(
                self.source.clone(),
                self.base_offset + offset,
                len,
            )),
            _ => Err(StreamError::OutOfRange {
                offset: offset as i128 + len as i128,
                len: self.len,
            }),
        }
    }

    /// Copy the whole range into memory. The cursor is not moved.
    pub fn to_bytes(&self) -> Result<Bytes, StreamError> {
        let len = usize::try_from(self.len).map_err(|_| StreamError::OutOfRange {
            offset: self.len as i128,
            len: self.len,
        })?;
        let mut buf = vec![0u8; len];
        let got = self.source.read_full_at(self.base_offset, &mut buf)?;
        if got < len {
            return Err(self.short_source(got as u64));
        }
        Ok(Bytes::from(buf))
    }

    fn short_source(&self, available: u64) -> StreamError {
        StreamError::TruncatedContainer {
            offset: self.base_offset,
            needed: self.len,
            available,
        }
    }
}

impl<S: ByteSource> Read for BoundedView<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let want = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
        let n = self
            .source
            .read_at(self.base_offset + self.cursor, &mut buf[..want])?;

        // The source shrank underneath us; don't pretend the view ended early.
        if n == 0 {
            return Err(StreamError::TruncatedContainer {
                offset: self.base_offset + self.cursor,
                needed: remaining,
                available: 0,
            }
            .into());
        }

        self.cursor += n as u64;
        Ok(n)
    }
}

impl<S: ByteSource> Seek for BoundedView<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target: i128 = match pos {
            SeekFrom::Start(n) => n as i128,
            SeekFrom::End(d) => self.len as i128 + d as i128,
            SeekFrom::Current(d) => self.cursor as i128 + d as i128,
        };

        if target < 0 || target > self.len as i128 {
            return Err(StreamError::OutOfRange {
                offset: target,
                len: self.len,
            }
            .into());
        }

        self.cursor = target as u64;
        Ok(self.cursor)
    }
}

/// Views nest: a view is itself a source addressed relative to its start.
impl<S: ByteSource> ByteSource for BoundedView<S> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        if offset >= self.len {
            return Ok(0);
        }
        let want = buf
            .len()
            .min(usize::try_from(self.len - offset).unwrap_or(usize::MAX));
        self.source.read_at(self.base_offset + offset, &mut buf[..want])
    }

    fn total_len(&self) -> io::Result<u64> {
        Ok(self.len)
    }
}
