use std::io::{self, Write};

use log::debug;

use crate::types::StreamError;

/// One logical sink that duplicates every write to all registered sinks.
///
/// Sinks are written in registration order with `write_all`. The first
/// failure stops the write; sinks before it already hold the bytes and are
/// not rolled back.
#[derive(Debug, Default)]
pub struct FanOut<W> {
    sinks: Vec<W>,
}

impl<W: Write> FanOut<W> {
    pub fn new<I>(sinks: I) -> Self
    where
        I: IntoIterator<Item = W>,
    {
        Self {
            sinks: sinks.into_iter().collect(),
        }
    }

    /// Register a sink after the existing ones.
    pub fn push(&mut self, sink: W) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn sinks(&self) -> &[W] {
        &self.sinks
    }

    pub fn into_inner(self) -> Vec<W> {
        self.sinks
    }

    /// Like `write_all`, but names the failing sink.
    pub fn broadcast(&mut self, buf: &[u8]) -> Result<(), StreamError> {
        for (index, sink) in self.sinks.iter_mut().enumerate() {
            sink.write_all(buf).map_err(|source| {
                debug!("[FANOUT] sink {index} failed: {source}");
                StreamError::DownstreamFailure { index, source }
            })?;
        }
        Ok(())
    }
}

impl<W: Write> Write for FanOut<W> {
    /// Returns the first failing sink's error unchanged.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for sink in self.sinks.iter_mut() {
            sink.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in self.sinks.iter_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}
