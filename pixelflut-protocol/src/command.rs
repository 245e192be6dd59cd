//! The pixelflut `PX` draw command.
//!
//! Wire format (one command per line, ASCII):
//!
//! ```text
//! PX <x> <y> <RRGGBB>\n
//! ```
//!
//! `<x>` and `<y>` are decimal without leading zeros, `<RRGGBB>` is six
//! uppercase hex digits. Servers compare byte-for-byte, so the encoder never
//! deviates from this form (no lowercase hex, no alpha channel, no padding).
//!
//! # Examples
//!
//! ```
//! use pixelflut_common::{Point, Rgb};
//! use pixelflut_protocol::CommandEncoder;
//!
//! let mut encoder = CommandEncoder::new();
//! let bytes = encoder.encode(Point::new(10, 20), Rgb::new(0xFF, 0x80, 0x00));
//! assert_eq!(bytes, b"PX 10 20 FF8000\n");
//! ```

use anyhow::{anyhow, bail, Result};
use pixelflut_common::{Point, Rgb};
use std::fmt;

/// Longest possible encoded command: `"PX "` + 10 digits + `' '` + 10 digits
/// + `' '` + 6 hex digits + `'\n'`.
pub const MAX_COMMAND_LEN: usize = 32;

const PREFIX: &[u8; 3] = b"PX ";
const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Encodes `PX` commands into a reusable fixed-size scratch buffer.
///
/// Encoding never allocates; the returned slice borrows the scratch buffer and
/// is valid until the next call.
#[derive(Debug, Clone)]
pub struct CommandEncoder {
    scratch: [u8; MAX_COMMAND_LEN],
}

impl Default for CommandEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandEncoder {
    /// Create an encoder with an empty scratch buffer.
    pub const fn new() -> Self {
        Self {
            scratch: [0; MAX_COMMAND_LEN],
        }
    }

    /// Encode one command for the pixel at `at` with color `color`.
    #[inline]
    pub fn encode(&mut self, at: Point, color: Rgb) -> &[u8] {
        let buf = &mut self.scratch;
        buf[..PREFIX.len()].copy_from_slice(PREFIX);
        let mut len = PREFIX.len();

        len += write_decimal(&mut buf[len..], at.x);
        buf[len] = b' ';
        len += 1;
        len += write_decimal(&mut buf[len..], at.y);
        buf[len] = b' ';
        len += 1;

        for channel in [color.r, color.g, color.b] {
            buf[len] = HEX_DIGITS[(channel >> 4) as usize];
            buf[len + 1] = HEX_DIGITS[(channel & 0x0F) as usize];
            len += 2;
        }
        buf[len] = b'\n';
        len += 1;

        &buf[..len]
    }
}

/// Write `value` in decimal at the start of `out`, returning the digit count.
#[inline]
fn write_decimal(out: &mut [u8], mut value: u32) -> usize {
    let mut digits = [0u8; 10];
    let mut start = digits.len();
    loop {
        start -= 1;
        digits[start] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    let n = digits.len() - start;
    out[..n].copy_from_slice(&digits[start..]);
    n
}

/// A decoded `PX` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub position: Point,
    pub color: Rgb,
}

impl Command {
    /// Create a new command.
    pub const fn new(position: Point, color: Rgb) -> Self {
        Self { position, color }
    }

    /// Parse one encoded command, including its trailing newline.
    ///
    /// Parsing is strict: only the exact form produced by [`CommandEncoder`]
    /// is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first deviation from the wire format.
    pub fn parse(line: &[u8]) -> Result<Self> {
        let body = line
            .strip_suffix(b"\n")
            .ok_or_else(|| anyhow!("command is not newline-terminated"))?;
        let body = body
            .strip_prefix(PREFIX.as_slice())
            .ok_or_else(|| anyhow!("command does not start with \"PX \""))?;

        let mut fields = body.split(|&b| b == b' ');
        let (Some(x), Some(y), Some(hex), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            bail!("expected exactly three fields after \"PX\"");
        };

        Ok(Self {
            position: Point::new(parse_decimal(x)?, parse_decimal(y)?),
            color: parse_hex_color(hex)?,
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PX {} {} {}", self.position.x, self.position.y, self.color)
    }
}

fn parse_decimal(field: &[u8]) -> Result<u32> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        bail!("coordinate {:?} is not decimal", String::from_utf8_lossy(field));
    }
    if field.len() > 1 && field[0] == b'0' {
        bail!("coordinate {:?} has a leading zero", String::from_utf8_lossy(field));
    }
    field.iter().try_fold(0u32, |acc, &d| {
        acc.checked_mul(10)
            .and_then(|v| v.checked_add((d - b'0') as u32))
            .ok_or_else(|| anyhow!("coordinate {:?} overflows", String::from_utf8_lossy(field)))
    })
}

fn parse_hex_color(field: &[u8]) -> Result<Rgb> {
    if field.len() != 6 {
        bail!("color must be 6 hex digits, got {}", field.len());
    }
    let nibble = |c: u8| -> Result<u8> {
        match c {
            b'0'..=b'9' => Ok(c - b'0'),
            b'A'..=b'F' => Ok(c - b'A' + 10),
            _ => bail!("invalid color digit {:?}", c as char),
        }
    };
    let byte = |i: usize| -> Result<u8> { Ok(nibble(field[i])? << 4 | nibble(field[i + 1])?) };
    Ok(Rgb::new(byte(0)?, byte(2)?, byte(4)?))
}
