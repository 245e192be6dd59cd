//! Pixelflut wire protocol implementation.
//!
//! This crate provides the write side of the pixelflut text protocol: encoding
//! of `PX` draw commands and the buffered output stream that puts them on a
//! socket.
//!
//! # Modules
//!
//! - [`command`] - `PX` command encoding and strict parsing
//! - [`io`] - Output stream with full-write semantics and optional batching
//!
//! # Examples
//!
//! ```
//! use pixelflut_common::{Point, Rgb};
//! use pixelflut_protocol::{CommandEncoder, PxOutStream};
//!
//! let mut encoder = CommandEncoder::new();
//! let mut out = PxOutStream::new(Vec::new());
//! out.write_command(encoder.encode(Point::new(0, 0), Rgb::WHITE))?;
//! assert_eq!(out.get_ref().as_slice(), b"PX 0 0 FFFFFF\n");
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod command;
pub mod io;

#[cfg(test)]
mod proptest_commands;

// Re-export commonly used types
pub use command::{Command, CommandEncoder, MAX_COMMAND_LEN};
pub use io::counting::CountingWriter;
pub use io::PxOutStream;
