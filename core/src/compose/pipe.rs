//! In-process pipe between one producer and one consumer.
//!
//! Backed by a `crossbeam` bounded channel of `Bytes` messages. Capacity 0 is
//! a rendezvous: `write` returns only once the reader has taken the message.
//!
//! Closure rules:
//! - writer closed or dropped: reader drains what was sent, then sees `Ok(0)`
//! - reader closed or dropped: pending and future writes fail with `ClosedPipe`

use std::io::{self, Read, Write};
use std::thread::{self, JoinHandle};

use bytes::{Buf, Bytes};
use crossbeam::channel::{bounded, Receiver, Sender};
use log::{debug, trace};

use crate::telemetry::PipeCounters;
use crate::types::StreamError;

/// Create a connected pipe. `capacity` is the number of in-flight writes;
/// 0 makes every write a rendezvous with a read.
pub fn pipe(capacity: usize) -> (PipeWriter, PipeReader) {
    let (tx, rx) = bounded::<Bytes>(capacity);
    debug!("[PIPE] open, capacity={capacity}");
    (
        PipeWriter {
            tx: Some(tx),
            counters: PipeCounters::default(),
        },
        PipeReader {
            rx: Some(rx),
            pending: Bytes::new(),
            counters: PipeCounters::default(),
        },
    )
}

/// Run `producer` on its own thread, feeding a fresh pipe.
///
/// The writer is closed when `producer` returns, success or not, so the
/// returned reader always reaches end-of-stream. The join handle yields the
/// writer's counters.
pub fn spawn_producer<F>(
    capacity: usize,
    producer: F,
) -> (PipeReader, JoinHandle<Result<PipeCounters, StreamError>>)
where
    F: FnOnce(&mut PipeWriter) -> Result<(), StreamError> + Send + 'static,
{
    let (mut writer, reader) = pipe(capacity);
    let handle = thread::spawn(move || {
        let result = producer(&mut writer);
        writer.close();
        result.map(|_| writer.counters().clone())
    });
    (reader, handle)
}

/// Producer end.
#[derive(Debug)]
pub struct PipeWriter {
    tx: Option<Sender<Bytes>>,
    counters: PipeCounters,
}

impl PipeWriter {
    /// Hand a buffer to the reader without copying it.
    /// Blocks until the reader takes it (or buffer room frees up).
    pub fn send(&mut self, data: Bytes) -> Result<(), StreamError> {
        let tx = self.live_sender()?;
        // Empty messages would look like nothing to the reader.
        if data.is_empty() {
            return Ok(());
        }

        let len = data.len();
        tx.send(data).map_err(|_| {
            debug!("[PIPE] write of {len} bytes rejected: reader closed");
            StreamError::ClosedPipe
        })?;

        trace!("[PIPE] sent {len} bytes");
        self.counters.add_sent(len);
        Ok(())
    }

    /// Sender still connected to a reader, or `ClosedPipe`.
    fn live_sender(&self) -> Result<&Sender<Bytes>, StreamError> {
        match self.tx.as_ref() {
            Some(tx) if !tx.is_disconnected() => Ok(tx),
            _ => Err(StreamError::ClosedPipe),
        }
    }

    /// Signal end-of-stream. Idempotent.
    pub fn close(&mut self) {
        if self.tx.take().is_some() {
            debug!(
                "[PIPE] writer closed after {} bytes",
                self.counters.bytes_sent
            );
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }

    pub fn counters(&self) -> &PipeCounters {
        &self.counters
    }
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            self.live_sender()?;
            return Ok(0);
        }
        self.send(Bytes::copy_from_slice(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Consumer end.
#[derive(Debug)]
pub struct PipeReader {
    rx: Option<Receiver<Bytes>>,
    /// Unread tail of the last received message.
    pending: Bytes,
    counters: PipeCounters,
}

impl PipeReader {
    /// Stop consuming. Blocked and future writes fail with `ClosedPipe`.
    /// Idempotent; later reads return end-of-stream.
    pub fn close(&mut self) {
        if self.rx.take().is_some() {
            debug!(
                "[PIPE] reader closed after {} bytes",
                self.counters.bytes_received
            );
        }
        self.pending.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.rx.is_none()
    }

    pub fn counters(&self) -> &PipeCounters {
        &self.counters
    }

    /// Next whole message, bypassing the byte-level `Read` interface.
    /// Returns any partially read message first. `None` at end-of-stream.
    pub fn recv(&mut self) -> Option<Bytes> {
        if !self.pending.is_empty() {
            return Some(std::mem::take(&mut self.pending));
        }
        let msg = self.rx.as_ref()?.recv().ok()?;
        self.counters.add_received(msg.len());
        Some(msg)
    }
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.pending.is_empty() {
            let Some(rx) = self.rx.as_ref() else {
                return Ok(0);
            };
            match rx.recv() {
                Ok(msg) => {
                    self.counters.add_received(msg.len());
                    self.pending = msg;
                }
                // Writer gone and channel drained
                Err(_) => {
                    trace!("[PIPE] end of stream");
                    return Ok(0);
                }
            }
        }

        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.advance(n);
        Ok(n)
    }
}
