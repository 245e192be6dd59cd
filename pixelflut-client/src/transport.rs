//! Transport layer (TCP and UDP) for pixelflut connections.
//!
//! The [`Connector`] trait is the seam between the session and the operating
//! system: it opens a socket for one [`Endpoint`], connects it, and closes it.
//! [`connect_first`] walks the resolver's candidates in order and keeps the
//! first socket that connects. [`SocketConnector`] is the real implementation
//! built on `socket2`.
//!
//! # Datagram "connections"
//!
//! Connecting a UDP socket only fixes the default destination of later
//! writes. It succeeds even when nothing listens at the remote end, and
//! pixelflut has no acknowledgment to detect that. Both properties are kept:
//! a datagram refused by the remote (reported asynchronously as
//! `ConnectionRefused`) counts as a lost datagram, not a transmit failure.
//!
//! # Examples
//!
//! ```no_run
//! use pixelflut_client::resolver::{Resolver, SystemResolver};
//! use pixelflut_client::transport::{connect_first, SocketConnector, Transport};
//!
//! # fn example() -> Result<(), pixelflut_client::PixelflutError> {
//! let endpoints = SystemResolver.resolve("localhost", 1234, Transport::Tcp)?;
//! let (socket, endpoint) = connect_first(&SocketConnector::default(), "localhost", 1234, &endpoints)?;
//! println!("Connected to {}", endpoint);
//! # drop(socket);
//! # Ok(())
//! # }
//! ```

use crate::errors::PixelflutError;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::fmt;
use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr};
use std::time::Duration;
use tracing::debug;

/// Transport protocol used to reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Connection-oriented byte stream.
    Tcp,
    /// Connectionless datagrams, no reliability layer.
    Udp,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Tcp => f.write_str("tcp"),
            Transport::Udp => f.write_str("udp"),
        }
    }
}

/// One resolved candidate address tagged with the transport to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Socket address of the candidate.
    pub addr: SocketAddr,
    /// Transport to reach it with.
    pub transport: Transport,
}

impl Endpoint {
    /// Create a new endpoint.
    pub const fn new(addr: SocketAddr, transport: Transport) -> Self {
        Self { addr, transport }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.transport)
    }
}

/// Opens, connects and closes sockets for candidate endpoints.
pub trait Connector {
    /// The connected socket handed to the session.
    type Socket: Write;

    /// Create an unconnected socket suitable for `endpoint`.
    fn open(&self, endpoint: &Endpoint) -> io::Result<Self::Socket>;

    /// Connect `socket` to `endpoint` (for datagrams: set the default destination).
    fn connect(&self, socket: &mut Self::Socket, endpoint: &Endpoint) -> io::Result<()>;

    /// Release `socket`.
    fn close(&self, socket: Self::Socket) -> io::Result<()>;
}

/// Connect to the first candidate that accepts, in the given order.
///
/// A socket that was opened for a failed candidate is closed before the next
/// candidate is tried. Candidates whose socket cannot even be opened are
/// skipped.
///
/// # Errors
///
/// Returns [`PixelflutError::Connect`] carrying the number of connect attempts
/// (candidates whose socket could not be created are not counted) and the
/// last I/O error when no candidate connects.
pub fn connect_first<C: Connector>(
    connector: &C,
    host: &str,
    port: u16,
    endpoints: &[Endpoint],
) -> Result<(C::Socket, Endpoint), PixelflutError> {
    let mut last_error = None;
    let mut attempts = 0;

    for endpoint in endpoints {
        let mut socket = match connector.open(endpoint) {
            Ok(socket) => socket,
            Err(e) => {
                debug!("could not create socket for {}: {}", endpoint, e);
                last_error = Some(e);
                continue;
            }
        };

        attempts += 1;
        match connector.connect(&mut socket, endpoint) {
            Ok(()) => return Ok((socket, *endpoint)),
            Err(e) => {
                debug!("connect to {} failed: {}", endpoint, e);
                if let Err(close_err) = connector.close(socket) {
                    debug!("closing failed candidate {}: {}", endpoint, close_err);
                }
                last_error = Some(e);
            }
        }
    }

    Err(PixelflutError::Connect {
        host: host.to_string(),
        port,
        attempts,
        source: last_error,
    })
}

/// Real connector backed by operating-system sockets.
#[derive(Debug, Clone, Default)]
pub struct SocketConnector {
    connect_timeout: Option<Duration>,
    tcp_nodelay: bool,
}

impl SocketConnector {
    /// Create a connector with no connect timeout and Nagle enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the time a single TCP connect attempt may take.
    ///
    /// Steady-state writes are never subject to a timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Disable Nagle's algorithm on connected TCP sockets.
    #[must_use]
    pub fn tcp_nodelay(mut self, nodelay: bool) -> Self {
        self.tcp_nodelay = nodelay;
        self
    }
}

impl Connector for SocketConnector {
    type Socket = PixelSocket;

    fn open(&self, endpoint: &Endpoint) -> io::Result<PixelSocket> {
        let (ty, protocol) = match endpoint.transport {
            Transport::Tcp => (Type::STREAM, Protocol::TCP),
            Transport::Udp => (Type::DGRAM, Protocol::UDP),
        };
        let socket = Socket::new(Domain::for_address(endpoint.addr), ty, Some(protocol))?;
        Ok(PixelSocket {
            socket,
            transport: endpoint.transport,
            connected: false,
        })
    }

    fn connect(&self, socket: &mut PixelSocket, endpoint: &Endpoint) -> io::Result<()> {
        let addr = SockAddr::from(endpoint.addr);
        match (endpoint.transport, self.connect_timeout) {
            (Transport::Tcp, Some(timeout)) => socket.socket.connect_timeout(&addr, timeout)?,
            _ => socket.socket.connect(&addr)?,
        }
        if endpoint.transport == Transport::Tcp && self.tcp_nodelay {
            socket.socket.set_nodelay(true)?;
        }
        socket.connected = true;
        Ok(())
    }

    fn close(&self, socket: PixelSocket) -> io::Result<()> {
        if socket.connected && socket.transport == Transport::Tcp {
            socket.socket.shutdown(Shutdown::Both)?;
        }
        Ok(())
    }
}

/// A connected TCP or UDP socket.
#[derive(Debug)]
pub struct PixelSocket {
    socket: Socket,
    transport: Transport,
    connected: bool,
}

impl PixelSocket {
    /// Transport of this socket.
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Local address of the socket, if bound.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.local_addr().ok().and_then(|a| a.as_socket())
    }

    /// Remote address of the socket, if connected.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.socket.peer_addr().ok().and_then(|a| a.as_socket())
    }
}

impl Write for PixelSocket {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.socket.write(buf) {
            Err(e) if self.transport == Transport::Udp && e.kind() == io::ErrorKind::ConnectionRefused => {
                // ICMP port unreachable for an earlier datagram: this one is lost.
                Ok(buf.len())
            }
            other => other,
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.socket.flush()
    }
}
