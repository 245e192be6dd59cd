//! Command-line arguments for pixelflut client applications.
//!
//! This module is only available when the `cli` feature is enabled. The
//! arguments are meant to be flattened into an application's own parser and
//! converted with [`Config::from_args`].
//!
//! # Examples
//!
//! ```no_run
//! use pixelflut_client::args::Args;
//! use pixelflut_client::Config;
//!
//! let args = Args::parse();
//! let config = Config::from_args(&args)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::{Config, ConfigBuilder};
use crate::errors::PixelflutError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Pixelflut connection arguments.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Pixelflut server hostname or IP address
    #[arg(value_name = "HOST", env = "PIXELFLUT_HOST")]
    pub host: Option<String>,

    /// Server port [default: 1234]
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// X offset of the picture on the canvas
    #[arg(short = 'x', long, value_name = "PIXELS")]
    pub off_x: Option<u32>,

    /// Y offset of the picture on the canvas
    #[arg(short = 'y', long, value_name = "PIXELS")]
    pub off_y: Option<u32>,

    /// Send UDP datagrams instead of a TCP stream
    #[arg(short = 'u', long)]
    pub udp: bool,

    /// Give up on a TCP connect attempt after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub connect_timeout_ms: Option<u64>,

    /// Coalesce commands into writes of up to this many bytes (0 = one write per pixel)
    #[arg(short = 'b', long, value_name = "BYTES")]
    pub batch_bytes: Option<usize>,

    /// Disable Nagle's algorithm on the TCP stream
    #[arg(long)]
    pub nodelay: bool,

    /// Configuration file path (TOML format)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Parse command-line arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse arguments from an iterator.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }
}

impl Config {
    /// Create a configuration from command-line arguments.
    ///
    /// If a config file is given it is loaded first; every option present on
    /// the command line overrides the file. Switches (`--udp`, `--nodelay`)
    /// can only turn a setting on.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The configuration validation fails (e.g. no host anywhere)
    pub fn from_args(args: &Args) -> Result<Self, PixelflutError> {
        let mut builder = match &args.config {
            Some(path) => ConfigBuilder::from_config(Config::load(path)?),
            None => Config::builder(),
        };

        if let Some(host) = &args.host {
            builder = builder.host(host.as_str());
        }
        if let Some(port) = args.port {
            builder = builder.port(port);
        }
        if args.udp {
            builder = builder.use_udp(true);
        }
        if args.nodelay {
            builder = builder.tcp_nodelay(true);
        }
        if let Some(ms) = args.connect_timeout_ms {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }
        if let Some(batch) = args.batch_bytes {
            builder = builder.batch_bytes(batch);
        }

        let current = builder.build_unchecked();
        let off_x = args.off_x.unwrap_or(current.canvas.off_x);
        let off_y = args.off_y.unwrap_or(current.canvas.off_y);

        ConfigBuilder::from_config(current).offset(off_x, off_y).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Transport;
    use pixelflut_common::Point;
    use std::io::Write;

    #[test]
    fn test_minimal_args() {
        let args = Args::try_parse_from(["pixelflut", "wall.local"]).unwrap();
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.connection.host, "wall.local");
        assert_eq!(config.connection.port, 1234);
        assert_eq!(config.transport(), Transport::Tcp);
        assert_eq!(config.offset(), Point::new(0, 0));
    }

    #[test]
    fn test_all_options() {
        let args = Args::try_parse_from([
            "pixelflut",
            "10.0.0.1",
            "--port",
            "4000",
            "--off-x",
            "100",
            "-y",
            "50",
            "--udp",
            "--batch-bytes",
            "1400",
            "--connect-timeout-ms",
            "250",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);

        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.connection.port, 4000);
        assert_eq!(config.offset(), Point::new(100, 50));
        assert_eq!(config.transport(), Transport::Udp);
        assert_eq!(config.output.batch_bytes, 1400);
        assert_eq!(config.connect_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_command_line_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[connection]\nhost = \"from-file\"\nport = 2000\n\n[canvas]\noff_x = 5\noff_y = 6\n"
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let args = Args::try_parse_from(["pixelflut", "--config", path, "--off-y", "60"]).unwrap();
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.connection.host, "from-file");
        assert_eq!(config.connection.port, 2000);
        assert_eq!(config.offset(), Point::new(5, 60));

        let args = Args::try_parse_from(["pixelflut", "--config", path, "other", "-p", "3000"]).unwrap();
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.connection.host, "other");
        assert_eq!(config.connection.port, 3000);
    }

    #[test]
    fn test_missing_host_is_config_error() {
        let args = Args {
            host: None,
            port: None,
            off_x: None,
            off_y: None,
            udp: false,
            connect_timeout_ms: None,
            batch_bytes: None,
            nodelay: false,
            config: None,
            verbose: 0,
        };
        let err = Config::from_args(&args).unwrap_err();
        assert!(matches!(err, PixelflutError::Config(_)));
    }

    #[test]
    fn test_negative_offset_rejected() {
        assert!(Args::try_parse_from(["pixelflut", "wall", "--off-x", "-5"]).is_err());
    }
}
