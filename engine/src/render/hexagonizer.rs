//! Hex Atlas Synthesis
//!
//! Builds a hexagon-masked tile atlas from a square one. Every 16x16 source
//! tile becomes an 18x16 destination tile: the tile is shifted right by one
//! pixel, its four corners are cut along the lines
//!
//! ```text
//! 2x + y =   6      2x - y =  26
//! 2x + y =  42      2x - y = -10
//! ```
//!
//! and the left/right notches left by the cut at rows 7 and 8 are filled
//! from the source edge columns.
//!
//! The boundary constants are tuned for exactly this 16 -> 18 transform;
//! other tile sizes are rejected.

use image::RgbaImage;

use super::atlas::TileAtlas;
use super::pixel_buffer::{PixelBuffer, TRANSPARENT};
use crate::error::{Result, TileMapError};
use crate::world::GridConfig;

/// Source tile edge the mask is derived for.
pub const SOURCE_TILE_SIZE: u32 = 16;

/// Destination hex tile width.
pub const HEX_TILE_WIDTH: u32 = 18;

/// Edge rows patched from the source after masking.
const PATCHED_ROWS: [u32; 2] = [7, 8];

/// Signed distance-like value of a local tile pixel to the hex silhouette.
///
/// Non-negative values are inside the kept region.
pub fn hex_mask(px: i32, py: i32) -> i32 {
    let d1 = 2 * (-6 + 2 * px + py) + 2 + 1;
    let d2 = 2 * (26 - 2 * px + py) - 2 + 1;
    let d3 = 2 * (42 - 2 * px - py) - 2 - 1;
    let d4 = 2 * (10 + 2 * px - py) + 2 - 1;
    d1.min(d2).min(d3.min(d4))
}

/// One-shot square-to-hex atlas transform.
#[derive(Clone, Copy, Debug)]
pub struct Hexagonizer {
    tile_size: u32,
    hex_width: u32,
}

impl Hexagonizer {
    /// Validate the tile sizes. Only 16 -> 18 is supported.
    pub fn new(tile_size: u32, hex_width: u32) -> Result<Self> {
        if tile_size != SOURCE_TILE_SIZE || hex_width != HEX_TILE_WIDTH {
            log::warn!("Hexagonizer: rejected tile transform {tile_size}->{hex_width}");
            return Err(TileMapError::UnsupportedTileSize {
                tile_size,
                hex_width,
            });
        }
        Ok(Self {
            tile_size,
            hex_width,
        })
    }

    pub fn from_config(config: &GridConfig) -> Result<Self> {
        Self::new(config.tile_size, config.hex_width)
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn hex_width(&self) -> u32 {
        self.hex_width
    }

    /// Output dimensions for a source atlas of `width x height`.
    pub fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        (width / self.tile_size * self.hex_width, height)
    }

    /// Transform `source` into a new hex atlas.
    ///
    /// Pixels outside the hex silhouette stay fully transparent. The source
    /// may be dropped afterwards.
    pub fn hexagonize<P: PixelBuffer>(&self, source: &P) -> Result<RgbaImage> {
        let (width, height) = (source.width(), source.height());
        if width % self.tile_size != 0 || height % self.tile_size != 0 {
            log::warn!(
                "Hexagonizer: atlas {width}x{height} is not aligned to {}px tiles",
                self.tile_size
            );
            return Err(TileMapError::AtlasNotTileAligned {
                width,
                height,
                tile_size: self.tile_size,
            });
        }

        let (out_width, out_height) = self.output_size(width, height);
        let mut hex = RgbaImage::from_pixel(out_width, out_height, TRANSPARENT);

        let tiles_x = width / self.tile_size;
        let tiles_y = height / self.tile_size;
        for i in 0..tiles_x {
            for j in 0..tiles_y {
                self.copy_tile(source, &mut hex, i, j);
            }
        }

        log::debug!(
            "Hexagonizer: {}x{} atlas ({} tiles) -> {}x{}",
            width,
            height,
            tiles_x * tiles_y,
            out_width,
            out_height
        );
        Ok(hex)
    }

    /// Hexagonize and slice the result into a [`TileAtlas`] of hex cells.
    pub fn build_atlas<P: PixelBuffer>(&self, source: &P) -> Result<(RgbaImage, TileAtlas)> {
        let hex = self.hexagonize(source)?;
        let atlas = TileAtlas::from_grid(
            hex.width(),
            hex.height(),
            self.hex_width,
            self.tile_size,
        )?;
        Ok((hex, atlas))
    }

    fn copy_tile<P: PixelBuffer>(&self, source: &P, hex: &mut RgbaImage, i: u32, j: u32) {
        let src_x0 = i * self.tile_size;
        let src_y0 = j * self.tile_size;
        let dst_x0 = i * self.hex_width;

        for px in 0..self.tile_size {
            for py in 0..self.tile_size {
                if hex_mask(px as i32, py as i32) < 0 {
                    continue;
                }
                let color = source.get_pixel(src_x0 + px, src_y0 + py);
                hex.set_pixel(dst_x0 + px + 1, src_y0 + py, color);
            }
        }

        let last_src = self.tile_size - 1;
        let last_dst = self.hex_width - 1;
        for row in PATCHED_ROWS {
            let y = src_y0 + row;
            hex.set_pixel(dst_x0, y, source.get_pixel(src_x0, y));
            hex.set_pixel(dst_x0 + last_dst, y, source.get_pixel(src_x0 + last_src, y));
        }
    }
}
