//! Reads fixed-size raw frames from a byte stream.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::warn;

/// Open `path` for reading, with `-` meaning standard input.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("Failed to open input '{}'", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Splits a byte stream into consecutive frames of `frame_len` bytes.
pub struct FrameReader<R> {
    reader: R,
    frame: Vec<u8>,
    frames_read: u64,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R, frame_len: usize) -> Self {
        Self {
            reader,
            frame: vec![0; frame_len],
            frames_read: 0,
        }
    }

    /// Read the next complete frame.
    ///
    /// Returns `None` at end of input. A truncated last frame is dropped
    /// with a warning.
    pub fn next_frame(&mut self) -> Result<Option<&[u8]>> {
        let mut filled = 0;
        while filled < self.frame.len() {
            match self.reader.read(&mut self.frame[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e).context("Failed to read frame data"),
            }
        }

        if filled < self.frame.len() {
            if filled > 0 {
                warn!(
                    "dropping truncated frame {}: {} of {} bytes",
                    self.frames_read + 1,
                    filled,
                    self.frame.len()
                );
            }
            return Ok(None);
        }

        self.frames_read += 1;
        Ok(Some(&self.frame))
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}
