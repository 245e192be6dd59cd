//! Per-frame transmission: pixels in, `PX` commands out.
//!
//! Pixels are sent in scanline order (top to bottom, left to right), which is
//! the order in which the picture builds up on the remote canvas. Every
//! coordinate is shifted by the session's canvas offset before encoding.

use crate::cancel::CancelToken;
use crate::errors::PixelflutError;
use crate::protocol_trace;
use crate::stream::FrameGeometry;
use pixelflut_common::Point;
use pixelflut_pixelbuffer::{ChannelOffsets, Frame, PixelFormat, BYTES_PER_PIXEL};
use pixelflut_protocol::{CommandEncoder, PxOutStream};
use std::io::Write;
use std::time::{Duration, Instant};

/// Outcome of one successfully transmitted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Commands written (one per pixel).
    pub commands: u64,
    /// Command bytes written.
    pub bytes: u64,
    /// Wall time spent in the transmit loop.
    pub elapsed: Duration,
}

/// Turns frames into command streams for one session.
#[derive(Debug, Clone)]
pub struct FrameTransmitter {
    encoder: CommandEncoder,
    offset: Point,
    geometry: FrameGeometry,
    channels: ChannelOffsets,
}

impl FrameTransmitter {
    /// Create a transmitter for frames of `geometry` in `format`, drawn at
    /// `offset` on the canvas.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `format` does not store each channel
    /// in a whole byte.
    pub fn new(
        offset: Point,
        geometry: FrameGeometry,
        format: PixelFormat,
    ) -> Result<Self, PixelflutError> {
        let channels = format.channel_offsets().ok_or_else(|| {
            PixelflutError::Config(format!("Pixel format {} has no byte-aligned channels", format))
        })?;
        Ok(Self {
            encoder: CommandEncoder::new(),
            offset,
            geometry,
            channels,
        })
    }

    /// Send every pixel of `frame` to `out`, then flush.
    ///
    /// `cancel` is checked before each pixel. A cancelled frame flushes the
    /// commands already produced and returns [`PixelflutError::Cancelled`].
    ///
    /// The `sent` count carried by errors is the number of commands of this
    /// frame the writer accepted in full; batched commands lost with a failed
    /// batch are not included.
    ///
    /// # Errors
    ///
    /// - [`PixelflutError::Config`] if the frame size differs from the
    ///   session's
    /// - [`PixelflutError::Transmit`] on the first hard I/O error, including
    ///   one while flushing a cancelled frame; the rest of the frame is skipped
    /// - [`PixelflutError::Cancelled`] if `cancel` fired
    pub fn transmit<W: Write>(
        &mut self,
        frame: &Frame<'_>,
        out: &mut PxOutStream<W>,
        cancel: &CancelToken,
    ) -> Result<FrameStats, PixelflutError> {
        if frame.width() != self.geometry.width || frame.height() != self.geometry.height {
            return Err(PixelflutError::Config(format!(
                "frame is {}x{} but the stream was opened as {}x{}",
                frame.width(),
                frame.height(),
                self.geometry.width,
                self.geometry.height
            )));
        }

        let start = Instant::now();
        let first = out.commands_written();
        let mut bytes = 0u64;

        for y in 0..frame.height() {
            let row = frame.row(y);
            let canvas_y = y + self.offset.y;

            for x in 0..frame.width() {
                if cancel.is_cancelled() {
                    let flushed = out.flush();
                    let sent = out.commands_written() - first;
                    return Err(match flushed {
                        Ok(()) => PixelflutError::Cancelled { sent },
                        Err(source) => PixelflutError::Transmit { sent, source },
                    });
                }

                let color = self.channels.read(row, x as usize * BYTES_PER_PIXEL);
                let command = self
                    .encoder
                    .encode(Point::new(x + self.offset.x, canvas_y), color);

                if let Err(source) = out.write_command(command) {
                    let sent = out.commands_written() - first;
                    return Err(PixelflutError::Transmit { sent, source });
                }
                protocol_trace::out_cmd(command);
                bytes += command.len() as u64;
            }
        }

        let flushed = out.flush();
        let sent = out.commands_written() - first;
        flushed.map_err(|source| PixelflutError::Transmit { sent, source })?;
        protocol_trace::frame_summary(sent, bytes);

        Ok(FrameStats {
            commands: sent,
            bytes,
            elapsed: start.elapsed(),
        })
    }
}
