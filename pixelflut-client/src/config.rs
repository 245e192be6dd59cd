//! Configuration types for the pixelflut client.

use crate::errors::PixelflutError;
use crate::transport::Transport;
use pixelflut_common::Point;
use pixelflut_protocol::MAX_COMMAND_LEN;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default pixelflut server port.
pub const DEFAULT_PORT: u16 = 1234;

/// Largest payload of a single UDP datagram over IPv4.
pub const MAX_DATAGRAM_PAYLOAD: usize = 65_507;

/// Complete pixelflut client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings.
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Canvas placement.
    #[serde(default)]
    pub canvas: CanvasConfig,
    /// Output stream settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Server hostname or IP address.
    #[serde(default)]
    pub host: String,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Send datagrams instead of using a TCP stream.
    #[serde(default)]
    pub use_udp: bool,
    /// Connect timeout in milliseconds (TCP only; no timeout when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,
    /// Disable Nagle's algorithm on the TCP stream.
    #[serde(default)]
    pub tcp_nodelay: bool,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            use_udp: false,
            connect_timeout_ms: None,
            tcp_nodelay: false,
        }
    }
}

/// Canvas placement configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// X offset on the pixelflut canvas.
    #[serde(default)]
    pub off_x: u32,
    /// Y offset on the pixelflut canvas.
    #[serde(default)]
    pub off_y: u32,
}

/// Output stream configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Coalesce commands into writes of at most this many bytes (0 = one
    /// write per command).
    #[serde(default)]
    pub batch_bytes: usize,
}

impl Config {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Loads a configuration from a TOML file.
    ///
    /// The result is not validated; the session validates it on open.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PixelflutError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PixelflutError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&text).map_err(|e| {
            PixelflutError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), PixelflutError> {
        if self.connection.host.is_empty() {
            return Err(PixelflutError::Config("pixelflut host not set".to_string()));
        }

        let batch = self.output.batch_bytes;
        if batch != 0 && batch < MAX_COMMAND_LEN {
            return Err(PixelflutError::Config(format!(
                "batch size must be 0 or at least {} bytes, got {}",
                MAX_COMMAND_LEN, batch
            )));
        }
        if self.connection.use_udp && batch > MAX_DATAGRAM_PAYLOAD {
            return Err(PixelflutError::Config(format!(
                "batch size {} exceeds the maximum datagram payload of {} bytes",
                batch, MAX_DATAGRAM_PAYLOAD
            )));
        }

        Ok(())
    }

    /// Returns the transport selected by `use_udp`.
    #[must_use]
    pub fn transport(&self) -> Transport {
        if self.connection.use_udp {
            Transport::Udp
        } else {
            Transport::Tcp
        }
    }

    /// Returns the canvas offset.
    #[must_use]
    pub fn offset(&self) -> Point {
        Point::new(self.canvas.off_x, self.canvas.off_y)
    }

    /// Returns the connect timeout, if one is configured.
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connection.connect_timeout_ms.map(Duration::from_millis)
    }
}

/// Builder for creating a `Config`.
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from an existing configuration (e.g. one loaded from a file).
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Sets the server hostname or IP address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.connection.host = host.into();
        self
    }

    /// Sets the server port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.connection.port = port;
        self
    }

    /// Selects UDP (`true`) or TCP (`false`).
    #[must_use]
    pub fn use_udp(mut self, use_udp: bool) -> Self {
        self.config.connection.use_udp = use_udp;
        self
    }

    /// Sets the canvas offset.
    #[must_use]
    pub fn offset(mut self, off_x: u32, off_y: u32) -> Self {
        self.config.canvas.off_x = off_x;
        self.config.canvas.off_y = off_y;
        self
    }

    /// Sets the TCP connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connection.connect_timeout_ms =
            Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Enables or disables `TCP_NODELAY`.
    #[must_use]
    pub fn tcp_nodelay(mut self, nodelay: bool) -> Self {
        self.config.connection.tcp_nodelay = nodelay;
        self
    }

    /// Sets the batch size in bytes (0 = one write per command).
    #[must_use]
    pub fn batch_bytes(mut self, batch_bytes: usize) -> Self {
        self.config.output.batch_bytes = batch_bytes;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<Config, PixelflutError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without validating it.
    #[must_use]
    pub fn build_unchecked(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_builder() {
        let config = Config::builder()
            .host("localhost")
            .port(4321)
            .offset(10, 20)
            .use_udp(true)
            .build()
            .unwrap();

        assert_eq!(config.connection.host, "localhost");
        assert_eq!(config.connection.port, 4321);
        assert_eq!(config.offset(), Point::new(10, 20));
        assert_eq!(config.transport(), Transport::Udp);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.connection.port, 1234);
        assert_eq!(config.offset(), Point::new(0, 0));
        assert_eq!(config.transport(), Transport::Tcp);
        assert_eq!(config.connect_timeout(), None);
        assert_eq!(config.output.batch_bytes, 0);
    }

    #[test]
    fn test_config_validation_empty_host() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, PixelflutError::Config(_)));
    }

    #[test]
    fn test_port_zero_is_accepted() {
        assert!(Config::builder().host("localhost").port(0).build().is_ok());
    }

    #[test]
    fn test_config_validation_batch_bounds() {
        let base = || Config::builder().host("localhost");
        assert!(base().batch_bytes(16).build().is_err());
        assert!(base().batch_bytes(MAX_COMMAND_LEN).build().is_ok());
        assert!(base().batch_bytes(1 << 20).build().is_ok());
        assert!(base().use_udp(true).batch_bytes(1 << 20).build().is_err());
        assert!(base().use_udp(true).batch_bytes(1400).build().is_ok());
    }

    #[test]
    fn test_connect_timeout() {
        let config = Config::builder()
            .host("localhost")
            .connect_timeout(Duration::from_secs(3))
            .build()
            .unwrap();
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_load_toml_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[connection]\nhost = \"wall.example\"\nuse_udp = true\n\n[canvas]\noff_y = 200\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.connection.host, "wall.example");
        assert_eq!(config.connection.port, DEFAULT_PORT);
        assert!(config.connection.use_udp);
        assert_eq!(config.offset(), Point::new(0, 200));
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/pixelflut.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_rejects_negative_offset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[connection]\nhost = \"a\"\n[canvas]\noff_x = -1\n").unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}
