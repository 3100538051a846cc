//! Tile Atlas
//!
//! Maps a non-negative tile index to a normalized UV rectangle inside an
//! atlas texture. Frames are sliced from a regular grid of equally sized
//! cells and numbered row-major. The atlas is immutable once built.

use crate::error::{Result, TileMapError};

/// Normalized texture-space rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UvRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl UvRect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Source of UV rectangles for tile indices.
///
/// A given index must map to the same rectangle for the atlas lifetime.
pub trait TextureAtlasSource {
    /// UV rectangle for `index`, or `None` when the atlas has no such frame.
    fn get(&self, index: i32) -> Option<UvRect>;

    /// Pixel width of a frame.
    fn cell_width(&self, rect: &UvRect) -> f32;

    /// Pixel height of a frame.
    fn cell_height(&self, rect: &UvRect) -> f32;
}

/// Grid-sliced atlas over a texture of known pixel size.
#[derive(Clone, Debug, PartialEq)]
pub struct TileAtlas {
    texture_width: u32,
    texture_height: u32,
    frames: Vec<UvRect>,
}

impl TileAtlas {
    /// Slice a `texture_width x texture_height` texture into
    /// `cell_width x cell_height` frames, row-major.
    ///
    /// Partial cells at the right/bottom edge are ignored.
    pub fn from_grid(
        texture_width: u32,
        texture_height: u32,
        cell_width: u32,
        cell_height: u32,
    ) -> Result<Self> {
        if cell_width == 0 || cell_height == 0 {
            return Err(TileMapError::AtlasNotTileAligned {
                width: texture_width,
                height: texture_height,
                tile_size: cell_width.min(cell_height),
            });
        }

        let columns = texture_width / cell_width;
        let rows = texture_height / cell_height;
        let (tw, th) = (texture_width as f32, texture_height as f32);

        let mut frames = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for col in 0..columns {
                let x = (col * cell_width) as f32;
                let y = (row * cell_height) as f32;
                frames.push(UvRect::new(
                    x / tw,
                    y / th,
                    (x + cell_width as f32) / tw,
                    (y + cell_height as f32) / th,
                ));
            }
        }

        Ok(Self {
            texture_width,
            texture_height,
            frames,
        })
    }

    /// Atlas with explicit frames, indexed by position.
    pub fn from_frames(texture_width: u32, texture_height: u32, frames: Vec<UvRect>) -> Self {
        Self {
            texture_width,
            texture_height,
            frames,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn texture_size(&self) -> (u32, u32) {
        (self.texture_width, self.texture_height)
    }
}

impl TextureAtlasSource for TileAtlas {
    fn get(&self, index: i32) -> Option<UvRect> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.frames.get(i))
            .copied()
    }

    fn cell_width(&self, rect: &UvRect) -> f32 {
        rect.width() * self.texture_width as f32
    }

    fn cell_height(&self, rect: &UvRect) -> f32 {
        rect.height() * self.texture_height as f32
    }
}
