//! Stream composition over readers and writers.
//!
//! - `Concat`: read members in order, exhausting each before the next
//! - `FanOut`: forward every write to all sinks in registration order
//! - `pipe`: one producer, one consumer, bounded or rendezvous hand-off
//!
//! Everything except the pipe runs on the caller's thread without locking.

pub mod concat;
pub mod fanout;
pub mod pipe;

pub use concat::Concat;
pub use fanout::FanOut;
pub use pipe::{pipe, spawn_producer, PipeReader, PipeWriter};

use std::io::{self, Read, Write};

use crate::constants::COPY_BUF_SIZE;

/// Copy up to `n` bytes from `reader` to `writer`.
/// Returns the number copied; less than `n` only if `reader` ran dry.
pub fn copy_n<R, W>(reader: &mut R, writer: &mut W, n: u64) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = [0u8; COPY_BUF_SIZE];
    let mut copied = 0u64;

    while copied < n {
        let want = (n - copied).min(COPY_BUF_SIZE as u64) as usize;
        let got = match reader.read(&mut buf[..want]) {
            Ok(0) => break,
            Ok(got) => got,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..got])?;
        copied += got as u64;
    }

    Ok(copied)
}
