//! Buffered output stream for pixelflut commands.
//!
//! [`PxOutStream`] sits between the command encoder and the socket. Every
//! command it accepts reaches the writer in full: short writes are continued
//! until the whole command (or batch) has been accepted, and `Interrupted`
//! writes are retried. A writer that accepts zero bytes, or any other I/O
//! error, is returned to the caller.
//!
//! # Batching
//!
//! - **Unbatched** ([`PxOutStream::new`]): each command is handed to the writer
//!   with its own write call. On a connected UDP socket this means one datagram
//!   per pixel.
//! - **Batched** ([`PxOutStream::with_batch`]): whole commands are coalesced up
//!   to `batch` bytes per write. A command is never split across two batches,
//!   so every datagram carries complete lines.
//!
//! # Examples
//!
//! ```
//! use pixelflut_protocol::io::PxOutStream;
//!
//! let mut out = PxOutStream::with_batch(Vec::new(), 64);
//! out.write_command(b"PX 0 0 000000\n")?;
//! out.write_command(b"PX 1 0 FFFFFF\n")?;
//! assert_eq!(out.buffered(), 28);
//!
//! out.flush()?;
//! assert_eq!(out.get_ref().as_slice(), b"PX 0 0 000000\nPX 1 0 FFFFFF\n");
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod counting;

use bytes::BytesMut;
use std::io::{self, Write};

/// Output stream that writes complete pixelflut commands.
pub struct PxOutStream<W> {
    writer: W,
    buffer: BytesMut,
    batch: usize,
    pending: u64,
    commands: u64,
}

impl<W: Write> PxOutStream<W> {
    /// Create an unbatched stream: one write call per command.
    pub fn new(writer: W) -> Self {
        Self::with_batch(writer, 0)
    }

    /// Create a stream that coalesces commands into writes of at most `batch`
    /// bytes. A `batch` of zero disables coalescing.
    pub fn with_batch(writer: W, batch: usize) -> Self {
        Self {
            writer,
            buffer: BytesMut::with_capacity(batch),
            batch,
            pending: 0,
            commands: 0,
        }
    }

    /// Write one encoded command.
    ///
    /// # Errors
    ///
    /// Returns the first hard I/O error of the underlying writer. On error the
    /// command (and, when batching, any batch it was part of) may have been
    /// partially written.
    pub fn write_command(&mut self, command: &[u8]) -> io::Result<()> {
        if self.batch == 0 {
            self.writer.write_all(command)?;
            self.commands += 1;
        } else {
            if !self.buffer.is_empty() && self.buffer.len() + command.len() > self.batch {
                self.flush_buffer()?;
            }
            self.buffer.extend_from_slice(command);
            self.pending += 1;
        }
        Ok(())
    }

    /// Write any pending batch and flush the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or if the underlying writer's
    /// `flush()` method returns an error.
    pub fn flush(&mut self) -> io::Result<()> {
        self.flush_buffer()?;
        self.writer.flush()
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            let result = self.writer.write_all(&self.buffer);
            let pending = std::mem::take(&mut self.pending);
            self.buffer.clear();
            result?;
            self.commands += pending;
        }
        Ok(())
    }

    /// Get the number of bytes waiting for the next batch write.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Get the number of commands handed to the writer in full so far.
    ///
    /// Commands waiting in a batch are not counted until the batch is written.
    pub fn commands_written(&self) -> u64 {
        self.commands
    }

    /// Get a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consume the stream and return the underlying writer.
    ///
    /// Pending batched bytes are discarded; call [`flush()`](Self::flush) first.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
