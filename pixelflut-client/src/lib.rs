//! Pixelflut streaming client.
//!
//! Draws raw video frames onto a shared pixelflut canvas by sending one
//! `PX <x> <y> <RRGGBB>\n` command per pixel over TCP or UDP. The crate plays
//! the role of a media output: the host opens a [`Session`] with the layout of
//! its single raw video stream, hands it one frame at a time, and closes it at
//! the end of the stream.
//!
//! # Quick Start
//!
//! ```no_run
//! use pixelflut_client::{Config, Session, StreamInfo};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let config = Config::builder()
//!         .host("pixelflut.example")
//!         .offset(200, 100)
//!         .build()?;
//!
//!     let mut session = Session::new(config);
//!     session.open(&[StreamInfo::raw_video(64, 48)])?;
//!
//!     let frame = vec![0u8; 64 * 48 * 4];
//!     let stats = session.send_packet(&frame)?;
//!     println!("{} commands, {} bytes", stats.commands, stats.bytes);
//!
//!     session.close()?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`resolver`]: host and port to an ordered list of candidate endpoints
//! - [`transport`]: tries candidates in order and keeps the first that connects
//! - [`transmit`]: walks a frame in scanline order and writes commands
//! - [`session`]: the open / send / close lifecycle tying them together
//!
//! Everything is synchronous and blocking. A [`CancelToken`] lets another
//! thread stop the frame in progress.
//!
//! # Error Handling
//!
//! Configuration problems are reported before any network activity. Network
//! failures are reported once and never retried internally; see
//! [`PixelflutError::is_retryable`].
//!
//! # Debugging
//!
//! Setting `PIXELFLUT_TRACE=1` logs every command sent under the
//! `protocol_trace` target at trace level.
//!
//! # Safety
//!
//! This crate is `#![forbid(unsafe_code)]` and uses only safe Rust.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

// Public modules
pub mod cancel;
pub mod config;
pub mod errors;
pub mod resolver;
pub mod session;
pub mod stream;
pub mod transmit;
pub mod transport;

// Private implementation modules
mod protocol_trace;

// Optional CLI support
#[cfg(feature = "cli")]
pub mod args;

// Re-exports
pub use cancel::CancelToken;
pub use config::Config;
pub use errors::PixelflutError;
pub use session::{ControlMessage, Session, SessionState};
pub use stream::{Codec, MediaType, StreamInfo};
pub use transmit::FrameStats;

pub use pixelflut_pixelbuffer::{Frame, PixelFormat};

/// Turn the per-command protocol trace on or off at runtime.
///
/// The initial value comes from the `PIXELFLUT_TRACE` environment variable.
pub fn set_protocol_trace(enabled: bool) {
    protocol_trace::set_enabled(enabled);
}
