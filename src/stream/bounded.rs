//! Bounded sequential reader
//!
//! Turns a [`SharedSource`] into a forward-only stream over the range
//! `[start, end)`. The reader keeps its own cursor and passes explicit
//! positions to the source, so the source is never locked out for other
//! consumers and is never closed by the reader.

use std::io::{self, Read, Write};
use std::sync::Arc;

use super::error::{Result, StreamError};
use super::source::SharedSource;
use crate::config::StreamConfig;

/// Logical state of a bounded reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Data remains in the range
    Active,
    /// The cursor reached the end of the range
    Exhausted,
}

/// Sequential reader over a fixed sub-range of a shared source
pub struct BoundedReader<S: SharedSource + ?Sized> {
    source: Arc<S>,
    start: u64,
    cursor: u64,
    end: u64,
}

impl<S: SharedSource + ?Sized> BoundedReader<S> {
    /// Create a reader covering the whole source
    pub fn new(source: Arc<S>) -> Result<Self> {
        Self::with_range(source, 0, None)
    }

    /// Create a reader over `length` bytes starting at `offset`
    ///
    /// A `length` of `None` stands for the full length of the source, so it
    /// is only valid together with an `offset` of zero. Use [`Self::to_end`]
    /// to read from an offset through the end of the source.
    pub fn with_range(source: Arc<S>, offset: u64, length: Option<u64>) -> Result<Self> {
        let total = source.length()?;
        let length = length.unwrap_or(total);

        if offset > total || length > total - offset {
            return Err(StreamError::Range {
                offset,
                length,
                total,
            });
        }

        log::debug!(
            "Bounded reader over [{}, {}) of {} byte source",
            offset,
            offset + length,
            total
        );

        Ok(Self {
            source,
            start: offset,
            cursor: offset,
            end: offset + length,
        })
    }

    /// Create a reader from `offset` through the end of the source
    pub fn to_end(source: Arc<S>, offset: u64) -> Result<Self> {
        let total = source.length()?;
        Self::with_range(source, offset, Some(total.saturating_sub(offset)))
    }

    /// Bytes left before the end of the range
    pub fn remaining(&self) -> u64 {
        self.end - self.cursor
    }

    /// Bytes left, saturated to `usize`
    pub fn available(&self) -> usize {
        usize::try_from(self.remaining()).unwrap_or(usize::MAX)
    }

    pub fn state(&self) -> StreamState {
        if self.cursor == self.end {
            StreamState::Exhausted
        } else {
            StreamState::Active
        }
    }

    /// Absolute position of the cursor in the source
    pub fn position(&self) -> u64 {
        self.cursor
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Length of the whole range, independent of the cursor
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The shared source this reader draws from
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Does nothing: the source may still be in use by other readers.
    pub fn close(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn mark_supported(&self) -> bool {
        false
    }

    pub fn mark(&mut self, _read_limit: usize) -> Result<()> {
        Err(StreamError::Unsupported("mark"))
    }

    pub fn reset(&mut self) -> Result<()> {
        Err(StreamError::Unsupported("reset"))
    }

    /// Read a single byte, `None` at the end of the range
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte, 0, 1)? {
            Some(1) => Ok(Some(byte[0])),
            _ => Ok(None),
        }
    }

    /// Read into the whole of `buf`
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        let len = buf.len();
        self.read(buf, 0, len)
    }

    /// Read up to `len` bytes into `buf[offset..offset + len]`
    ///
    /// Returns `Ok(None)` once the range is exhausted, without touching the
    /// source. A zero-length request on an active reader returns `Some(0)`.
    /// If the source itself reports end of data, `Ok(None)` is passed on
    /// and the cursor stays put.
    pub fn read(&mut self, buf: &mut [u8], offset: usize, len: usize) -> Result<Option<usize>> {
        let capacity = buf.len();
        match offset.checked_add(len) {
            Some(end) if end <= capacity => {}
            _ => {
                return Err(StreamError::BufferBounds {
                    offset,
                    len,
                    capacity,
                })
            }
        }

        if self.cursor == self.end {
            return Ok(None);
        }
        if len == 0 {
            return Ok(Some(0));
        }

        // Clip the request so it never crosses the end of the range
        let capped = (len as u64).min(self.remaining()) as usize;
        log::trace!("read_from({}, {} bytes)", self.cursor, capped);

        match self.source.read_from(self.cursor, &mut buf[offset..offset + capped])? {
            Some(n) => {
                let n = n.min(capped);
                self.cursor += n as u64;
                Ok(Some(n))
            }
            None => {
                log::warn!(
                    "Source ended at {} before range end {}",
                    self.cursor,
                    self.end
                );
                Ok(None)
            }
        }
    }

    /// Skip up to `n` bytes, returning the number actually skipped
    ///
    /// The request is clipped to the end of the range before the source is
    /// asked, same as reads.
    pub fn skip(&mut self, n: u64) -> Result<u64> {
        let capped = n.min(self.remaining());
        if capped == 0 {
            return Ok(0);
        }

        log::trace!("skip_from({}, {} bytes)", self.cursor, capped);
        let skipped = self.source.skip_from(self.cursor, capped)?.min(capped);
        self.cursor += skipped;
        Ok(skipped)
    }

    /// Drain the rest of the range into `writer` with the default buffer size
    pub fn copy_to<W: Write + ?Sized>(&mut self, writer: &mut W) -> Result<u64> {
        self.copy_to_with(writer, &StreamConfig::default())
    }

    /// Drain the rest of the range into `writer`
    pub fn copy_to_with<W: Write + ?Sized>(
        &mut self,
        writer: &mut W,
        config: &StreamConfig,
    ) -> Result<u64> {
        let chunk = (config.effective_copy_buffer_size() as u64).min(self.remaining()) as usize;
        let mut buffer = vec![0u8; chunk.max(1)];
        let mut copied = 0u64;

        while let Some(n) = self.read_into(&mut buffer)? {
            if n == 0 {
                break;
            }
            writer.write_all(&buffer[..n])?;
            copied += n as u64;
        }

        log::debug!("Copied {} bytes, {} left in range", copied, self.remaining());
        Ok(copied)
    }
}

impl<S: SharedSource + ?Sized> Read for BoundedReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_into(buf)?.unwrap_or(0))
    }
}
