//! Pixel Buffer Access
//!
//! The minimal RGBA pixel interface the atlas hexagonizer works against.
//! `image::RgbaImage` is the standard backing store; releasing a buffer is
//! handled by `Drop`.

use image::{Rgba, RgbaImage};

/// Fully transparent black.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Mutable rectangular RGBA pixel storage.
pub trait PixelBuffer {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8>;
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>);
}

impl PixelBuffer for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *image::ImageBuffer::get_pixel(self, x, y)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        self.put_pixel(x, y, color);
    }
}
