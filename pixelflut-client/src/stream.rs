//! Description of the input streams a host offers to a session.

use crate::errors::PixelflutError;
use pixelflut_common::Rect;
use pixelflut_pixelbuffer::PixelFormat;
use std::fmt;

/// Kind of media carried by a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum MediaType {
    Video,
    Audio,
    Subtitle,
    Data,
}

/// Codec of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codec {
    /// Uncompressed frames, one pixel buffer per frame.
    RawVideo,
    /// Anything else, by name.
    Other(String),
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::RawVideo => f.write_str("rawvideo"),
            Codec::Other(name) => f.write_str(name),
        }
    }
}

/// Stream parameters declared by the host when opening a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// Kind of media.
    pub media_type: MediaType,
    /// Codec of the packets.
    pub codec: Codec,
    /// Layout of one pixel (video only).
    pub pixel_format: PixelFormat,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl StreamInfo {
    /// A raw RGB32 video stream of the given size.
    pub fn raw_video(width: u32, height: u32) -> Self {
        Self {
            media_type: MediaType::Video,
            codec: Codec::RawVideo,
            pixel_format: PixelFormat::rgb32(),
            width,
            height,
        }
    }

    /// Replace the declared pixel format.
    #[must_use]
    pub fn with_pixel_format(mut self, pixel_format: PixelFormat) -> Self {
        self.pixel_format = pixel_format;
        self
    }
}

/// Validated frame geometry of an open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Check that `streams` is exactly one raw RGB32 video stream whose pixels,
/// shifted by the canvas offset, stay within `u32` coordinates.
pub(crate) fn validate_streams(
    streams: &[StreamInfo],
    off_x: u32,
    off_y: u32,
) -> Result<FrameGeometry, PixelflutError> {
    let [stream] = streams else {
        return Err(PixelflutError::Config(format!(
            "Only supports one rawvideo stream, got {} streams",
            streams.len()
        )));
    };

    if stream.media_type != MediaType::Video || stream.codec != Codec::RawVideo {
        return Err(PixelflutError::Config(format!(
            "Only supports one rawvideo stream, got {:?} stream with codec {}",
            stream.media_type, stream.codec
        )));
    }

    if !stream.pixel_format.is_rgb32() {
        return Err(PixelflutError::Config(format!(
            "Pixel format {} is not supported. Must be {} instead.",
            stream.pixel_format,
            PixelFormat::rgb32()
        )));
    }

    let area = Rect::new(off_x, off_y, stream.width, stream.height);
    if !area.fits_canvas() {
        return Err(PixelflutError::Config(format!(
            "{}x{} frame at offset ({}, {}) exceeds the canvas coordinate range",
            stream.width, stream.height, off_x, off_y
        )));
    }

    Ok(FrameGeometry {
        width: stream.width,
        height: stream.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_raw_stream_accepted() {
        let geometry = validate_streams(&[StreamInfo::raw_video(640, 480)], 10, 20).unwrap();
        assert_eq!(
            geometry,
            FrameGeometry {
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn test_stream_count() {
        assert!(validate_streams(&[], 0, 0).is_err());
        let two = [StreamInfo::raw_video(1, 1), StreamInfo::raw_video(1, 1)];
        let err = validate_streams(&two, 0, 0).unwrap_err();
        assert!(err.to_string().contains("got 2 streams"));
    }

    #[test]
    fn test_non_video_rejected() {
        let mut audio = StreamInfo::raw_video(1, 1);
        audio.media_type = MediaType::Audio;
        assert!(validate_streams(&[audio], 0, 0).is_err());

        let mut encoded = StreamInfo::raw_video(1, 1);
        encoded.codec = Codec::Other("h264".to_string());
        let err = validate_streams(&[encoded], 0, 0).unwrap_err();
        assert!(err.to_string().contains("h264"));
    }

    #[test]
    fn test_pixel_format_mismatch_names_both() {
        let stream = StreamInfo::raw_video(1, 1).with_pixel_format(PixelFormat::bgr32());
        let err = validate_streams(&[stream], 0, 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Pixel format bgr32 is not supported. Must be rgb32 instead."
        );
    }

    #[test]
    fn test_offset_overflow_rejected() {
        let stream = StreamInfo::raw_video(2, 1);
        assert!(validate_streams(&[stream.clone()], u32::MAX - 1, 0).is_ok());
        assert!(validate_streams(&[stream], u32::MAX, 0).is_err());
    }
}
