//! Error types for the pixelflut client.

use crate::session::SessionState;
use std::io;
use thiserror::Error;

/// Errors that can occur while streaming frames to a pixelflut server.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum PixelflutError {
    /// Configuration error (missing host, stream layout, pixel format, frame size).
    ///
    /// Always detected before any network activity.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Name resolution produced no usable address.
    #[error("Name resolution for {host:?} failed: {source}")]
    Resolution {
        host: String,
        #[source]
        source: io::Error,
    },

    /// No resolved address accepted a connection (host unreachable).
    #[error("Could not connect to {host}:{port} ({attempts} address(es) tried)")]
    Connect {
        host: String,
        port: u16,
        attempts: usize,
        #[source]
        source: Option<io::Error>,
    },

    /// I/O failure while writing commands; the current frame was aborted.
    #[error("Transmit error after {sent} command(s): {source}")]
    Transmit {
        sent: u64,
        #[source]
        source: io::Error,
    },

    /// Failure while releasing the connection.
    #[error("Teardown error: {0}")]
    Teardown(#[source] io::Error),

    /// Frame buffer does not cover the declared geometry.
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Operation called in a lifecycle state that does not allow it.
    #[error("Cannot {operation} a session in state {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// The host cancelled the frame in progress.
    #[error("Frame cancelled after {sent} command(s)")]
    Cancelled { sent: u64 },

    /// Requested feature is not implemented.
    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl PixelflutError {
    /// Returns true if a fresh attempt by the host may succeed.
    ///
    /// Retryable errors are network conditions: resolution, connection and
    /// transmission failures. Nothing is retried inside the library; the host
    /// decides whether to open a new session.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Resolution { .. } | Self::Connect { .. } | Self::Transmit { .. }
        )
    }

    /// Returns true if this is a fatal error that should not be retried.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !self.is_retryable()
    }
}
