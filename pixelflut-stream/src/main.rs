use anyhow::{bail, Context, Result};
use clap::Parser;
use pixelflut_client::args::Args;
use pixelflut_client::{Config, Session, StreamInfo};
use std::path::PathBuf;
use tracing::info;

mod input;

use input::{open_input, FrameReader};

/// Stream raw RGB32 video onto a pixelflut canvas.
///
/// Frames are read back to back from the input, each WIDTH*HEIGHT*4 bytes in
/// blue, green, red, padding order.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    connection: Args,

    /// Frame width in pixels
    #[arg(long, value_name = "PIXELS", value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Frame height in pixels
    #[arg(long, value_name = "PIXELS", value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Raw frame input, `-` for stdin
    #[arg(short = 'i', long, value_name = "FILE", default_value = "-")]
    input: PathBuf,

    /// Start over at the end of the input (files only)
    #[arg(long)]
    repeat: bool,

    /// Log every command sent
    #[arg(long)]
    trace: bool,
}

fn init_logging(verbose: u8, trace: bool) -> Result<()> {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let mut default_filter = format!("pixelflut_stream={},pixelflut_client={}", log_level, log_level);
    if trace {
        default_filter.push_str(",protocol_trace=trace");
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

fn frame_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .with_context(|| format!("{}x{} frames are too large", width, height))
}

fn run(cli: &Cli) -> Result<()> {
    if cli.repeat && cli.input.as_os_str() == "-" {
        bail!("--repeat needs a file input, not stdin");
    }

    let config = Config::from_args(&cli.connection)?;
    let frame_len = frame_len(cli.width, cli.height)?;

    let mut session = Session::new(config);
    session.open(&[StreamInfo::raw_video(cli.width, cli.height)])?;

    let mut pass = 0u64;
    loop {
        pass += 1;
        let mut frames = FrameReader::new(open_input(&cli.input)?, frame_len);
        while let Some(frame) = frames.next_frame()? {
            session.send_packet(frame)?;
        }
        info!("Input pass {} done: {} frames", pass, frames.frames_read());

        if !cli.repeat || frames.frames_read() == 0 {
            break;
        }
    }

    info!(
        "Sent {} frames, {} bytes",
        session.frames_sent(),
        session.bytes_sent()
    );
    session.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging first
    init_logging(cli.connection.verbose, cli.trace)?;
    if cli.trace {
        pixelflut_client::set_protocol_trace(true);
    }

    info!("Starting pixelflut-stream {}", env!("CARGO_PKG_VERSION"));
    run(&cli)
}
