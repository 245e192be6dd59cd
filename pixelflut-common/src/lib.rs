//! Common types shared by the pixelflut streaming crates.
//!
//! This crate provides the small value types used across the workspace:
//! - [`Point`] - canvas coordinate (non-negative, as on the pixelflut wire)
//! - [`Rect`] - canvas region occupied by a stream (offset plus dimensions)
//! - [`Rgb`] - 8-bit-per-channel color

use std::fmt;

/// A position on the remote canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A canvas region defined by top-left position and dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the right edge (x + width), exclusive.
    pub const fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Get the bottom edge (y + height), exclusive.
    pub const fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Check whether every pixel of the rectangle has a coordinate
    /// representable as `u32`.
    pub const fn fits_canvas(&self) -> bool {
        self.right() <= u32::MAX as u64 + 1 && self.bottom() <= u32::MAX as u64 + 1
    }
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a new color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point() {
        let p = Point::new(10, 20);
        assert_eq!(p.x, 10);
        assert_eq!(p.y, 20);
    }

    #[test]
    fn test_rect() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.right(), 110);
        assert_eq!(r.bottom(), 70);
        assert!(r.fits_canvas());
    }

    #[test]
    fn test_rect_fits_canvas_edges() {
        // Last pixel lands exactly on u32::MAX
        assert!(Rect::new(u32::MAX - 9, 0, 10, 1).fits_canvas());
        assert!(!Rect::new(u32::MAX - 9, 0, 11, 1).fits_canvas());
        assert!(!Rect::new(0, u32::MAX, 1, 2).fits_canvas());
    }

    #[test]
    fn test_rgb_display() {
        assert_eq!(Rgb::new(0x12, 0xAB, 0x0F).to_string(), "12AB0F");
        assert_eq!(Rgb::BLACK.to_string(), "000000");
        assert_eq!(Rgb::WHITE.to_string(), "FFFFFF");
    }
}
