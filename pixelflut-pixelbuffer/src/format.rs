//! Pixel format descriptions for frames handed to the streamer.
//!
//! This module defines the [`PixelFormat`] type which describes how a pixel is
//! laid out in a frame buffer: storage size, byte order and the bit position
//! of each 8-bit color channel.
//!
//! # The RGB32 Layout
//!
//! The streamer consumes exactly one layout, [`PixelFormat::rgb32()`]: a native
//! 32-bit `0xXXRRGGBB` word stored little-endian. In memory a pixel with
//! R=0xAA, G=0xBB, B=0xCC therefore reads:
//!
//! ```text
//! offset:  +0    +1    +2    +3
//! byte:    0xCC  0xBB  0xAA  (ignored)
//!          blue  green red
//! ```
//!
//! Other formats can still be described (hosts declare what they produce), so
//! that a mismatch is reported by name instead of as garbage on the canvas.
//!
//! # Channel Extraction
//!
//! The per-pixel hot path never assembles pixel words. Instead it asks the
//! format once for [`ChannelOffsets`] (byte index of each channel within a
//! pixel) and indexes the frame directly.
//!
//! # Example
//!
//! ```
//! use pixelflut_common::Rgb;
//! use pixelflut_pixelbuffer::PixelFormat;
//!
//! let pf = PixelFormat::rgb32();
//! assert_eq!(pf.bytes_per_pixel(), 4);
//!
//! let pixel = [0xCC, 0xBB, 0xAA, 0x00];
//! assert_eq!(pf.rgb(&pixel), Rgb::new(0xAA, 0xBB, 0xCC));
//! ```

use pixelflut_common::Rgb;
use std::fmt;

/// Describes a true-color pixel layout with 8 bits per channel.
///
/// # Standard Formats
///
/// - [`PixelFormat::rgb32()`] - the only layout the streamer accepts
/// - [`PixelFormat::bgr32()`] - red in the lowest byte
/// - [`PixelFormat::rgb24()`] - packed 3 bytes, red first
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct PixelFormat {
    /// Bits used per pixel (bpp), e.g., 32 for RGB32.
    pub bits_per_pixel: u8,

    /// Actual color depth (sum of significant bits), e.g., 24 for RGB32.
    pub depth: u8,

    /// Byte order of the pixel word (`true` = big endian, `false` = little endian).
    pub big_endian: bool,

    /// Bit shift for the least significant bit of the red component.
    pub red_shift: u8,

    /// Bit shift for the least significant bit of the green component.
    pub green_shift: u8,

    /// Bit shift for the least significant bit of the blue component.
    pub blue_shift: u8,
}

/// Byte index of each color channel within one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOffsets {
    pub red: usize,
    pub green: usize,
    pub blue: usize,
}

impl ChannelOffsets {
    /// Read the color of the pixel that starts at `base` in `data`.
    ///
    /// # Panics
    ///
    /// Panics if the pixel lies outside `data`.
    #[inline]
    pub fn read(&self, data: &[u8], base: usize) -> Rgb {
        Rgb::new(
            data[base + self.red],
            data[base + self.green],
            data[base + self.blue],
        )
    }
}

impl PixelFormat {
    /// Returns bytes-per-pixel (storage width), rounded up to the nearest byte.
    pub fn bytes_per_pixel(&self) -> u8 {
        self.bits_per_pixel.div_ceil(8)
    }

    /// Returns the 32bpp layout the streamer consumes.
    ///
    /// - 32 bits per pixel (4 bytes), 24-bit depth
    /// - Little-endian byte order
    /// - Red at bit 16, Green at bit 8, Blue at bit 0
    ///
    /// # Example
    ///
    /// ```
    /// use pixelflut_pixelbuffer::PixelFormat;
    ///
    /// let pf = PixelFormat::rgb32();
    /// assert_eq!(pf.bits_per_pixel, 32);
    /// assert!(!pf.big_endian);
    /// assert_eq!(pf.red_shift, 16);
    /// ```
    pub const fn rgb32() -> Self {
        Self {
            bits_per_pixel: 32,
            depth: 24,
            big_endian: false,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
        }
    }

    /// Returns the 32bpp layout with red in the lowest byte.
    pub const fn bgr32() -> Self {
        Self {
            bits_per_pixel: 32,
            depth: 24,
            big_endian: false,
            red_shift: 0,
            green_shift: 8,
            blue_shift: 16,
        }
    }

    /// Returns the packed 24bpp layout with red first in memory.
    pub const fn rgb24() -> Self {
        Self {
            bits_per_pixel: 24,
            depth: 24,
            big_endian: true,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
        }
    }

    /// Check if this is the RGB32 layout.
    pub fn is_rgb32(&self) -> bool {
        *self == Self::rgb32()
    }

    /// Short name for well-known layouts.
    pub fn name(&self) -> Option<&'static str> {
        if *self == Self::rgb32() {
            Some("rgb32")
        } else if *self == Self::bgr32() {
            Some("bgr32")
        } else if *self == Self::rgb24() {
            Some("rgb24")
        } else {
            None
        }
    }

    /// Byte index of each channel within a pixel.
    ///
    /// Returns `None` unless every channel occupies a whole byte inside the
    /// pixel storage.
    pub fn channel_offsets(&self) -> Option<ChannelOffsets> {
        let bpp = self.bytes_per_pixel() as usize;
        let index = |shift: u8| -> Option<usize> {
            if shift % 8 != 0 || (shift / 8) as usize >= bpp {
                return None;
            }
            let lsb_index = (shift / 8) as usize;
            Some(if self.big_endian {
                bpp - 1 - lsb_index
            } else {
                lsb_index
            })
        };
        Some(ChannelOffsets {
            red: index(self.red_shift)?,
            green: index(self.green_shift)?,
            blue: index(self.blue_shift)?,
        })
    }

    /// Converts one pixel in this format to an [`Rgb`] color.
    ///
    /// # Panics
    ///
    /// Panics if `pixel.len()` does not equal `self.bytes_per_pixel()`.
    pub fn rgb(&self, pixel: &[u8]) -> Rgb {
        let bpp = self.bytes_per_pixel() as usize;
        assert_eq!(
            pixel.len(),
            bpp,
            "pixel length {} does not match bytes_per_pixel {}",
            pixel.len(),
            bpp
        );

        let mut value = 0u32;
        if self.big_endian {
            for &byte in pixel {
                value = (value << 8) | (byte as u32);
            }
        } else {
            for (i, &byte) in pixel.iter().enumerate() {
                value |= (byte as u32) << (i * 8);
            }
        }

        Rgb::new(
            (value >> self.red_shift) as u8,
            (value >> self.green_shift) as u8,
            (value >> self.blue_shift) as u8,
        )
    }

    /// Converts an [`Rgb`] color to raw pixel bytes in this format.
    ///
    /// Padding bits are left at zero.
    ///
    /// ```
    /// use pixelflut_common::Rgb;
    /// use pixelflut_pixelbuffer::PixelFormat;
    ///
    /// let raw = PixelFormat::rgb32().pixel(Rgb::new(0xAA, 0xBB, 0xCC));
    /// assert_eq!(raw, vec![0xCC, 0xBB, 0xAA, 0x00]);
    /// ```
    pub fn pixel(&self, color: Rgb) -> Vec<u8> {
        let mut value = ((color.r as u32) << self.red_shift)
            | ((color.g as u32) << self.green_shift)
            | ((color.b as u32) << self.blue_shift);

        let bpp = self.bytes_per_pixel() as usize;
        let mut result = vec![0u8; bpp];
        if self.big_endian {
            for i in 0..bpp {
                result[bpp - 1 - i] = (value & 0xFF) as u8;
                value >>= 8;
            }
        } else {
            for item in result.iter_mut() {
                *item = (value & 0xFF) as u8;
                value >>= 8;
            }
        }
        result
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(
                f,
                "{}bpp/{} {} r{} g{} b{}",
                self.bits_per_pixel,
                self.depth,
                if self.big_endian { "be" } else { "le" },
                self.red_shift,
                self.green_shift,
                self.blue_shift
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(PixelFormat::rgb32().bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::rgb24().bytes_per_pixel(), 3);
    }

    #[test]
    fn test_rgb32_channel_offsets() {
        let offsets = PixelFormat::rgb32().channel_offsets().unwrap();
        assert_eq!(
            offsets,
            ChannelOffsets {
                red: 2,
                green: 1,
                blue: 0
            }
        );
    }

    #[test]
    fn test_other_channel_offsets() {
        let bgr = PixelFormat::bgr32().channel_offsets().unwrap();
        assert_eq!((bgr.red, bgr.green, bgr.blue), (0, 1, 2));

        let rgb24 = PixelFormat::rgb24().channel_offsets().unwrap();
        assert_eq!((rgb24.red, rgb24.green, rgb24.blue), (0, 1, 2));
    }

    #[test]
    fn test_channel_offsets_rejects_unaligned() {
        let pf = PixelFormat {
            bits_per_pixel: 16,
            depth: 16,
            big_endian: false,
            red_shift: 11,
            green_shift: 5,
            blue_shift: 0,
        };
        assert!(pf.channel_offsets().is_none());
    }

    #[test]
    fn test_rgb_little_endian() {
        let pf = PixelFormat::rgb32();
        let pixel = [0x33, 0x22, 0x11, 0x7F];
        assert_eq!(pf.rgb(&pixel), Rgb::new(0x11, 0x22, 0x33));
    }

    #[test]
    fn test_offsets_agree_with_rgb() {
        let pf = PixelFormat::rgb32();
        let pixel = [0x01, 0x02, 0x03, 0xFF];
        let offsets = pf.channel_offsets().unwrap();
        assert_eq!(offsets.read(&pixel, 0), pf.rgb(&pixel));
    }

    #[test]
    fn test_pixel_round_trip() {
        for pf in [PixelFormat::rgb32(), PixelFormat::bgr32(), PixelFormat::rgb24()] {
            let color = Rgb::new(0x12, 0x34, 0x56);
            assert_eq!(pf.rgb(&pf.pixel(color)), color, "format {pf}");
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(PixelFormat::rgb32().to_string(), "rgb32");
        assert_eq!(PixelFormat::bgr32().to_string(), "bgr32");
        let odd = PixelFormat {
            bits_per_pixel: 16,
            depth: 15,
            big_endian: true,
            red_shift: 10,
            green_shift: 5,
            blue_shift: 0,
        };
        assert_eq!(odd.to_string(), "16bpp/15 be r10 g5 b0");
        assert!(!odd.is_rgb32());
    }

    #[test]
    #[should_panic(expected = "pixel length")]
    fn test_rgb_wrong_size_panics() {
        PixelFormat::rgb32().rgb(&[0x11, 0x22]);
    }
}
