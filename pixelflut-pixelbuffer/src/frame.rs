//! Read-only view of one video frame.
//!
//! # Stride is in Pixels, Not Bytes!
//!
//! The row stride of a [`Frame`] is measured in **pixels**. To calculate byte
//! offsets:
//!
//! ```text
//! byte_offset = (y * stride + x) * BYTES_PER_PIXEL
//! ```
//!
//! A tightly packed frame (every row directly follows the previous one) has
//! `stride == width`, which is what [`Frame::new`] assumes.

use anyhow::{bail, Context, Result};

/// Storage size of one pixel in every frame the streamer accepts.
pub const BYTES_PER_PIXEL: usize = 4;

/// A borrowed frame buffer in the 4-byte RGB32 layout.
///
/// # Examples
///
/// ```
/// use pixelflut_pixelbuffer::Frame;
///
/// let data = vec![0u8; 2 * 2 * 4];
/// let frame = Frame::new(&data, 2, 2)?;
/// assert_eq!(frame.row(1).len(), 8);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> Frame<'a> {
    /// Wrap a tightly packed buffer (`stride == width`).
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is shorter than `width * height` pixels.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self> {
        Self::with_stride(data, width, height, width as usize)
    }

    /// Wrap a buffer whose rows start `stride` pixels apart.
    ///
    /// Only the bytes that belong to visible pixels must be present; the
    /// padding after the last row may be missing.
    ///
    /// # Errors
    ///
    /// Returns an error if `stride < width` or if `data` does not cover every
    /// visible pixel.
    pub fn with_stride(data: &'a [u8], width: u32, height: u32, stride: usize) -> Result<Self> {
        if stride < width as usize {
            bail!("stride {} is smaller than width {}", stride, width);
        }
        let required = required_len(width, height, stride)
            .with_context(|| format!("frame {}x{} (stride {}) is too large", width, height, stride))?;
        if data.len() < required {
            bail!(
                "frame buffer holds {} bytes but {}x{} (stride {}) needs {}",
                data.len(),
                width,
                height,
                stride,
                required
            );
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in pixels.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw bytes of the visible part of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &'a [u8] {
        assert!(y < self.height, "row {} out of bounds (height {})", y, self.height);
        let start = y as usize * self.stride * BYTES_PER_PIXEL;
        &self.data[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    /// Raw bytes of the pixel at (`x`, `y`).
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> &'a [u8] {
        assert!(x < self.width, "column {} out of bounds (width {})", x, self.width);
        let start = x as usize * BYTES_PER_PIXEL;
        &self.row(y)[start..start + BYTES_PER_PIXEL]
    }
}

/// Number of bytes a frame of the given geometry must provide.
fn required_len(width: u32, height: u32, stride: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }
    (height as usize - 1)
        .checked_mul(stride)?
        .checked_add(width as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}
