//! Host name resolution.
//!
//! Turns a host string and port into the ordered list of candidate
//! [`Endpoint`]s that the connector tries. Both address families are
//! returned, in the order the platform resolver prefers them.

use crate::errors::PixelflutError;
use crate::transport::{Endpoint, Transport};
use std::io;
use std::net::ToSocketAddrs;

/// Resolves a host and port to candidate endpoints.
pub trait Resolver {
    /// Resolve `host`:`port`, tagging every candidate with `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`PixelflutError::Resolution`] when the host is empty, when the
    /// lookup fails, or when it yields no addresses. The underlying reason is
    /// kept as the error source.
    fn resolve(
        &self,
        host: &str,
        port: u16,
        transport: Transport,
    ) -> Result<Vec<Endpoint>, PixelflutError>;
}

/// Resolver backed by the operating system (`getaddrinfo` on Unix).
///
/// IPv6 literals may be given with or without brackets.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    fn resolve(
        &self,
        host: &str,
        port: u16,
        transport: Transport,
    ) -> Result<Vec<Endpoint>, PixelflutError> {
        let failed = |source: io::Error| PixelflutError::Resolution {
            host: host.to_string(),
            source,
        };

        if host.is_empty() {
            return Err(failed(io::Error::new(
                io::ErrorKind::InvalidInput,
                "host is empty",
            )));
        }

        let name = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        let endpoints: Vec<Endpoint> = (name, port)
            .to_socket_addrs()
            .map_err(failed)?
            .map(|addr| Endpoint::new(addr, transport))
            .collect();

        if endpoints.is_empty() {
            return Err(failed(io::Error::new(
                io::ErrorKind::NotFound,
                "no addresses found",
            )));
        }

        tracing::debug!(
            "resolved {} to {} candidate(s): {:?}",
            host,
            endpoints.len(),
            endpoints.iter().map(|e| e.addr).collect::<Vec<_>>()
        );
        Ok(endpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_resolve_ipv4_literal() {
        let endpoints = SystemResolver.resolve("127.0.0.1", 1234, Transport::Tcp).unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].addr.ip(), IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(endpoints[0].addr.port(), 1234);
        assert_eq!(endpoints[0].transport, Transport::Tcp);
    }

    #[test]
    fn test_resolve_ipv6_literal_with_brackets() {
        for host in ["::1", "[::1]"] {
            let endpoints = SystemResolver.resolve(host, 4000, Transport::Udp).unwrap();
            assert_eq!(endpoints[0].addr.ip(), IpAddr::V6(Ipv6Addr::LOCALHOST));
            assert_eq!(endpoints[0].transport, Transport::Udp);
        }
    }

    #[test]
    fn test_resolve_localhost_tags_every_candidate() {
        let endpoints = SystemResolver.resolve("localhost", 1, Transport::Udp).unwrap();
        assert!(!endpoints.is_empty());
        assert!(endpoints.iter().all(|e| e.transport == Transport::Udp && e.addr.port() == 1));
    }

    #[test]
    fn test_resolve_empty_host() {
        let err = SystemResolver.resolve("", 1234, Transport::Tcp).unwrap_err();
        assert!(matches!(err, PixelflutError::Resolution { .. }));
    }

    #[test]
    fn test_resolve_unknown_host() {
        // .invalid is reserved and never resolves
        let err = SystemResolver
            .resolve("pixelflut.invalid", 1234, Transport::Tcp)
            .unwrap_err();
        match err {
            PixelflutError::Resolution { host, .. } => assert_eq!(host, "pixelflut.invalid"),
            other => panic!("expected Resolution error, got {other:?}"),
        }
    }
}
