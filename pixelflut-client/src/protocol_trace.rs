//! Opt-in trace of every command written to the wire.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};

static TRACE_ENABLED: Lazy<AtomicBool> = Lazy::new(|| {
    let on = std::env::var("PIXELFLUT_TRACE")
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE"))
        .unwrap_or(false);
    AtomicBool::new(on)
});

#[inline]
pub fn enabled() -> bool {
    TRACE_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn set_enabled(on: bool) {
    TRACE_ENABLED.store(on, Ordering::Relaxed)
}

#[inline]
pub fn out_cmd(command: &[u8]) {
    if enabled() {
        let line = command.strip_suffix(b"\n").unwrap_or(command);
        tracing::trace!(target: "protocol_trace", "OUT {}", String::from_utf8_lossy(line));
    }
}

pub fn frame_summary(commands: u64, bytes: u64) {
    if enabled() {
        tracing::info!(target: "protocol_trace", "FRAME {} commands {} bytes", commands, bytes);
    }
}
