//! Session lifecycle: open, send frames, close.
//!
//! A [`Session`] owns at most one connection. It is created unopened, opened
//! once with the stream layout of the input, fed one frame per `send()` call
//! and closed once. Every misuse is reported as an error, never ignored.
//!
//! ```text
//!            open()              close()
//! Unopened ────────► Open ───────────────────► Closed
//!    │                 │ transmit error           ▲
//!    │                 ▼                          │
//!    │               Failed ──────────────────────┤
//!    └────────────────────────────────────────────┘
//! ```

use crate::cancel::CancelToken;
use crate::config::Config;
use crate::errors::PixelflutError;
use crate::resolver::{Resolver, SystemResolver};
use crate::stream::{validate_streams, FrameGeometry, StreamInfo};
use crate::transmit::{FrameStats, FrameTransmitter};
use crate::transport::{connect_first, Connector, Endpoint, SocketConnector};
use pixelflut_pixelbuffer::{Frame, PixelFormat};
use pixelflut_protocol::{CountingWriter, PxOutStream};
use std::fmt;
use tracing::{debug, info, warn};

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not connected yet.
    Unopened,
    /// Connected and accepting frames.
    Open,
    /// A transmit error left the connection in an undefined state.
    Failed,
    /// Closed; terminal.
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Unopened => "unopened",
            SessionState::Open => "open",
            SessionState::Failed => "failed",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Out-of-band requests a media pipeline may send to its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Stop presenting frames.
    Pause,
    /// Resume presenting frames.
    Play,
    /// Redraw the last frame.
    WindowRepaint,
    /// Output area was resized.
    WindowSize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}

struct Connection<S> {
    out: PxOutStream<CountingWriter<S>>,
    endpoint: Endpoint,
    geometry: FrameGeometry,
    transmitter: FrameTransmitter,
}

/// Streams frames to one pixelflut server.
///
/// # Examples
///
/// ```no_run
/// use pixelflut_client::{Config, Session, StreamInfo};
///
/// # fn example() -> Result<(), pixelflut_client::PixelflutError> {
/// let config = Config::builder().host("localhost").offset(100, 50).build()?;
/// let mut session = Session::new(config);
/// session.open(&[StreamInfo::raw_video(2, 1)])?;
///
/// // Two RGB32 pixels: black, white
/// let frame = [0, 0, 0, 0, 255, 255, 255, 0];
/// session.send_packet(&frame)?;
/// session.close()?;
/// # Ok(())
/// # }
/// ```
pub struct Session<R: Resolver = SystemResolver, C: Connector = SocketConnector> {
    config: Config,
    resolver: R,
    connector: C,
    state: SessionState,
    connection: Option<Connection<C::Socket>>,
    cancel: CancelToken,
    frames_sent: u64,
}

impl Session {
    /// Create an unopened session that resolves and connects through the
    /// operating system.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let connector = SocketConnector::new()
            .connect_timeout(config.connect_timeout())
            .tcp_nodelay(config.connection.tcp_nodelay);
        Self::with_parts(config, SystemResolver, connector)
    }
}

impl<R: Resolver, C: Connector> Session<R, C> {
    /// Create an unopened session with a custom resolver and connector.
    pub fn with_parts(config: Config, resolver: R, connector: C) -> Self {
        Self {
            config,
            resolver,
            connector,
            state: SessionState::Unopened,
            connection: None,
            cancel: CancelToken::new(),
            frames_sent: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Configuration the session was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A token that cancels the frame in progress from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Endpoint of the open connection.
    pub fn endpoint(&self) -> Option<Endpoint> {
        self.connection.as_ref().map(|c| c.endpoint)
    }

    /// Number of frames sent completely.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Bytes accepted by the connection so far.
    pub fn bytes_sent(&self) -> u64 {
        self.connection
            .as_ref()
            .map_or(0, |c| c.out.get_ref().bytes_written())
    }

    /// Validate the input streams and configuration, then resolve the host and
    /// connect to the first address that accepts.
    ///
    /// Validation happens before any network activity. On a resolution or
    /// connect failure the session stays [`SessionState::Unopened`] and
    /// `open()` may be called again.
    ///
    /// # Errors
    ///
    /// - [`PixelflutError::Config`] for a stream layout other than one raw
    ///   RGB32 video stream, or an invalid configuration
    /// - [`PixelflutError::Resolution`] / [`PixelflutError::Connect`] for
    ///   network failures
    /// - [`PixelflutError::InvalidState`] if the session is not unopened
    pub fn open(&mut self, streams: &[StreamInfo]) -> Result<(), PixelflutError> {
        if self.state != SessionState::Unopened {
            return Err(PixelflutError::InvalidState {
                operation: "open",
                state: self.state,
            });
        }

        let offset = self.config.offset();
        let geometry = validate_streams(streams, offset.x, offset.y)?;
        self.config.validate()?;
        let transmitter = FrameTransmitter::new(offset, geometry, PixelFormat::rgb32())?;

        let host = &self.config.connection.host;
        let port = self.config.connection.port;
        let endpoints = self.resolver.resolve(host, port, self.config.transport())?;
        let (socket, endpoint) = connect_first(&self.connector, host, port, &endpoints)?;

        info!(
            "Connected to {} ({}x{} at {},{})",
            endpoint, geometry.width, geometry.height, offset.x, offset.y
        );

        self.connection = Some(Connection {
            out: PxOutStream::with_batch(
                CountingWriter::new(socket),
                self.config.output.batch_bytes,
            ),
            endpoint,
            geometry,
            transmitter,
        });
        self.state = SessionState::Open;
        Ok(())
    }

    /// Send one frame.
    ///
    /// Blocks until every pixel was written and flushed, the frame was
    /// cancelled, or a write failed. A write failure moves the session to
    /// [`SessionState::Failed`]; the host should close it.
    ///
    /// # Errors
    ///
    /// - [`PixelflutError::InvalidState`] unless the session is open
    /// - [`PixelflutError::Config`] if the frame size differs from the one
    ///   given to `open()`
    /// - [`PixelflutError::Transmit`] on an I/O error
    /// - [`PixelflutError::Cancelled`] if the cancel token is set
    pub fn send(&mut self, frame: &Frame<'_>) -> Result<FrameStats, PixelflutError> {
        let connection = match (self.state, self.connection.as_mut()) {
            (SessionState::Open, Some(connection)) => connection,
            (state, _) => {
                return Err(PixelflutError::InvalidState {
                    operation: "send",
                    state,
                })
            }
        };

        match connection
            .transmitter
            .transmit(frame, &mut connection.out, &self.cancel)
        {
            Ok(stats) => {
                self.frames_sent += 1;
                debug!(
                    "frame {}: {} commands, {} bytes in {:?}",
                    self.frames_sent, stats.commands, stats.bytes, stats.elapsed
                );
                Ok(stats)
            }
            Err(e @ PixelflutError::Transmit { .. }) => {
                warn!("{}; session failed", e);
                self.state = SessionState::Failed;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Send one frame given as a tightly packed RGB32 buffer of the size
    /// declared at `open()`.
    ///
    /// # Errors
    ///
    /// As [`send()`](Self::send), plus [`PixelflutError::InvalidFrame`] if the
    /// buffer is shorter than one frame.
    pub fn send_packet(&mut self, data: &[u8]) -> Result<FrameStats, PixelflutError> {
        let geometry = match (self.state, self.connection.as_ref()) {
            (SessionState::Open, Some(connection)) => connection.geometry,
            (state, _) => {
                return Err(PixelflutError::InvalidState {
                    operation: "send",
                    state,
                })
            }
        };

        let frame = Frame::new(data, geometry.width, geometry.height)
            .map_err(|e| PixelflutError::InvalidFrame(e.to_string()))?;
        self.send(&frame)
    }

    /// Flush pending output and release the connection.
    ///
    /// The session is [`SessionState::Closed`] afterwards, even when an error
    /// is returned. Closing a closed session does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PixelflutError::Teardown`] if flushing or releasing the
    /// connection failed.
    pub fn close(&mut self) -> Result<(), PixelflutError> {
        let previous = std::mem::replace(&mut self.state, SessionState::Closed);
        let Some(connection) = self.connection.take() else {
            if previous == SessionState::Unopened {
                debug!("closing a session that was never opened");
            }
            return Ok(());
        };

        let Connection {
            mut out, endpoint, ..
        } = connection;

        // After a transmit error the stream holds no complete commands.
        let flushed = if previous == SessionState::Open {
            out.flush()
        } else {
            Ok(())
        };
        let bytes = out.get_ref().bytes_written();
        let released = self.connector.close(out.into_inner().into_inner());

        info!(
            "Closed connection to {} ({} frames, {} bytes)",
            endpoint, self.frames_sent, bytes
        );

        match (flushed, released) {
            (Err(e), _) | (Ok(()), Err(e)) => {
                warn!("teardown of {} failed: {}", endpoint, e);
                Err(PixelflutError::Teardown(e))
            }
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    /// Handle a control message from the pipeline.
    ///
    /// # Errors
    ///
    /// Always returns [`PixelflutError::NotSupported`].
    pub fn control_message(&mut self, message: ControlMessage) -> Result<(), PixelflutError> {
        Err(PixelflutError::NotSupported(format!(
            "control message {:?}",
            message
        )))
    }
}

impl<R: Resolver, C: Connector> Drop for Session<R, C> {
    fn drop(&mut self) {
        if self.connection.is_some() {
            warn!("session dropped while {}; releasing connection", self.state);
            if let Err(e) = self.close() {
                warn!("release on drop failed: {}", e);
            }
        }
    }
}

impl<R: Resolver, C: Connector> fmt::Debug for Session<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.config.connection.host)
            .field("port", &self.config.connection.port)
            .field("state", &self.state)
            .field("endpoint", &self.endpoint())
            .field("frames_sent", &self.frames_sent)
            .finish()
    }
}
