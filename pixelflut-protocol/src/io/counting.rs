//! Counting writer wrapper for tracking bytes handed to the transport.
//!
//! The streamer reports how many bytes each frame put on the wire. Wrapping
//! the socket in a [`CountingWriter`] counts what the socket actually
//! accepted, independent of how the output stream batches.

use std::io::{self, Write};

/// A wrapper around a `Write` that counts the total number of bytes accepted.
///
/// # Examples
///
/// ```
/// use pixelflut_protocol::io::counting::CountingWriter;
/// use std::io::Write;
///
/// let mut counting = CountingWriter::new(Vec::new());
/// counting.write_all(b"PX 0 0 000000\n")?;
/// assert_eq!(counting.bytes_written(), 14);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W> CountingWriter<W> {
    /// Create a new CountingWriter wrapping the given writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Get the total number of bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Unwrap the CountingWriter and return the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Get a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most three bytes per call.
    struct Narrow(Vec<u8>);

    impl Write for Narrow {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(3);
            self.0.extend_from_slice(&buf[..n]);
            Ok(n)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_counting_writer_tracks_bytes() {
        let mut counting = CountingWriter::new(Vec::new());
        counting.write_all(b"Hello").unwrap();
        assert_eq!(counting.bytes_written(), 5);
        counting.write_all(b", world").unwrap();
        assert_eq!(counting.bytes_written(), 12);
        assert_eq!(counting.get_ref().as_slice(), b"Hello, world");
    }

    #[test]
    fn test_counts_only_accepted_bytes() {
        let mut counting = CountingWriter::new(Narrow(Vec::new()));
        assert_eq!(counting.write(b"PX 0 0").unwrap(), 3);
        assert_eq!(counting.bytes_written(), 3);
    }
}
