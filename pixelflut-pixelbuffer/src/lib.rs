//! Pixel buffer types for the pixelflut streamer.
//!
//! This crate provides the pixel format description and the read-only frame
//! view that hosts hand to the streamer.

pub mod format;
pub mod frame;

pub use format::{ChannelOffsets, PixelFormat};
pub use frame::{Frame, BYTES_PER_PIXEL};
