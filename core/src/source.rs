//! Byte sources addressed by absolute offset.
//!
//! Everything in this crate reads through [`ByteSource`]: a finite byte store
//! that can answer a positioned read without a shared cursor. Views and walkers
//! keep their own offsets, so any number of them can borrow one source.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bytes::Bytes;

/// Finite, read-only byte store with positioned reads.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes starting at `offset`.
    /// Returns 0 at or past end-of-source.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Total length of the source in bytes.
    fn total_len(&self) -> io::Result<u64>;

    /// Fill as much of `buf` as the source allows starting at `offset`.
    /// Returns the number of bytes filled; short only at end-of-source.
    fn read_full_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read_at(offset + filled as u64, &mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl ByteSource for [u8] {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let start = match usize::try_from(offset) {
            Ok(start) if start < self.len() => start,
            _ => return Ok(0),
        };
        let n = buf.len().min(self.len() - start);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }

    fn total_len(&self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }
}

impl ByteSource for Vec<u8> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.as_slice().read_at(offset, buf)
    }

    fn total_len(&self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }
}

impl ByteSource for Bytes {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.as_ref().read_at(offset, buf)
    }

    fn total_len(&self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }
}

impl ByteSource for File {
    #[cfg(unix)]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        std::os::unix::fs::FileExt::read_at(self, buf, offset)
    }

    #[cfg(windows)]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        std::os::windows::fs::FileExt::seek_read(self, buf, offset)
    }

    fn total_len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &S {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_at(offset, buf)
    }

    fn total_len(&self) -> io::Result<u64> {
        (**self).total_len()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Arc<S> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_at(offset, buf)
    }

    fn total_len(&self) -> io::Result<u64> {
        (**self).total_len()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_at(offset, buf)
    }

    fn total_len(&self) -> io::Result<u64> {
        (**self).total_len()
    }
}

/// Adapts any `Read + Seek` into a [`ByteSource`].
///
/// Every positioned read takes the lock, seeks, then reads, so concurrent
/// views over one `SeekSource` are serialised rather than interleaved.
#[derive(Debug)]
pub struct SeekSource<R> {
    inner: Mutex<R>,
}

impl<R: Read + Seek> SeekSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    pub fn into_inner(self) -> io::Result<R> {
        self.inner.into_inner().map_err(|_| poisoned())
    }
}

impl<R: Read + Seek> ByteSource for SeekSource<R> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let mut guard = self.inner.lock().map_err(|_| poisoned())?;
        guard.seek(SeekFrom::Start(offset))?;
        guard.read(buf)
    }

    fn total_len(&self) -> io::Result<u64> {
        let mut guard = self.inner.lock().map_err(|_| poisoned())?;
        guard.seek(SeekFrom::End(0))
    }
}

fn poisoned() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "source lock poisoned")
}

/// Canonical input abstraction
pub enum InputSource {
    File(PathBuf),
    Memory(Bytes),
    Reader(Box<dyn ReadSeek + Send>),
}

/// `Read + Seek` as a single object-safe trait.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Normalize an input into a shareable positioned source
pub fn open_source(src: InputSource) -> io::Result<Arc<dyn ByteSource + Send + Sync>> {
    let source: Arc<dyn ByteSource + Send + Sync> = match src {
        InputSource::File(p) => Arc::new(File::open(p)?),
        InputSource::Memory(b) => Arc::new(b),
        InputSource::Reader(r) => Arc::new(SeekSource::new(r)),
    };
    Ok(source)
}
