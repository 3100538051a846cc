//! Grid Configuration Module
//!
//! Contains the tile-grid configuration (geometry mode, tile sizes, tint)
//! and the [`TileGrid`] index storage shared by the renderer and the
//! dungeon adapter.
//!
//! ## Tile Sizes
//! Source atlases use 16x16 tiles. In hex mode they are synthesized into
//! 18x16 hexagon-masked tiles; square mode renders the 16x16 tiles directly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::hex_math::{GridMode, HexCell};
use crate::error::{Result, TileMapError};

/// Flat lighting applied to every tile: `color * multiply + add`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileTint {
    /// Multiplicative RGBA factor
    pub multiply: [f32; 4],
    /// Additive RGBA offset
    pub add: [f32; 4],
}

impl Default for TileTint {
    fn default() -> Self {
        Self {
            multiply: [1.0, 1.0, 1.0, 1.0],
            add: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

impl TileTint {
    /// Uniform brightness scale, alpha untouched.
    pub fn ambient(brightness: f32) -> Self {
        Self {
            multiply: [brightness, brightness, brightness, 1.0],
            ..Default::default()
        }
    }
}

/// Tile-grid configuration, owned by the level/scene context.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Hex (staggered columns) or square geometry
    pub mode: GridMode,
    /// Edge of a source atlas tile in pixels
    pub tile_size: u32,
    /// Width of a synthesized hex tile in pixels
    pub hex_width: u32,
    /// Height of a rendered tile in pixels
    pub tile_height: u32,
    /// Flat ambient/additive lighting
    pub tint: TileTint,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::hex()
    }
}

impl GridConfig {
    /// Hex grid with the 16 -> 18 atlas transform.
    pub fn hex() -> Self {
        Self {
            mode: GridMode::Hex,
            tile_size: 16,
            hex_width: 18,
            tile_height: 16,
            tint: TileTint::default(),
        }
    }

    /// Square grid rendering 16x16 tiles directly.
    pub fn square() -> Self {
        Self {
            mode: GridMode::Square,
            ..Self::hex()
        }
    }

    /// Parse a JSON configuration. Missing fields take the hex defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rendered cell width: the hex width in hex mode, the tile size otherwise.
    pub fn cell_width(&self) -> f32 {
        match self.mode {
            GridMode::Hex => self.hex_width as f32,
            GridMode::Square => self.tile_size as f32,
        }
    }

    pub fn cell_height(&self) -> f32 {
        self.tile_height as f32
    }

    /// Horizontal advance between columns in pixels.
    pub fn column_stride(&self) -> f32 {
        self.mode.column_ratio() * self.cell_width()
    }
}

/// Flat row-major array of tile indices.
///
/// Negative indices are "not rendered" but still occupy their slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileGrid {
    data: Vec<i32>,
    columns: usize,
    rows: usize,
}

impl TileGrid {
    /// Wrap `data` as a grid of `columns` columns.
    ///
    /// Fails when `data.len()` is not a whole number of rows.
    pub fn new(data: Vec<i32>, columns: usize) -> Result<Self> {
        if columns == 0 || data.len() % columns != 0 {
            return Err(TileMapError::GridLengthMismatch {
                len: data.len(),
                columns,
            });
        }
        let rows = data.len() / columns;
        Ok(Self {
            data,
            columns,
            rows,
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cells (`columns * rows`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, cell: usize) -> Option<i32> {
        self.data.get(cell).copied()
    }

    /// Overwrite one cell.
    pub fn set(&mut self, cell: usize, index: i32) -> Result<()> {
        let size = self.data.len();
        let slot = self
            .data
            .get_mut(cell)
            .ok_or(TileMapError::CellOutOfRange { cell, size })?;
        *slot = index;
        Ok(())
    }

    /// Whether the cell produces a visible quad.
    pub fn needs_render(&self, cell: usize) -> bool {
        self.get(cell).is_some_and(|index| index >= 0)
    }

    pub fn cell_position(&self, cell: usize) -> HexCell {
        HexCell::from_index(cell, self.columns)
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_config_defaults() {
        let config = GridConfig::default();
        assert_eq!(config.mode, GridMode::Hex);
        assert_eq!(config.cell_width(), 18.0);
        assert_eq!(config.cell_height(), 16.0);
        assert_eq!(config.column_stride(), 14.0);
    }

    #[test]
    fn test_square_config() {
        let config = GridConfig::square();
        assert_eq!(config.cell_width(), 16.0);
        assert_eq!(config.column_stride(), 16.0);
    }

    #[test]
    fn test_config_from_json() {
        let config = GridConfig::from_json_str(r#"{ "mode": "square" }"#).unwrap();
        assert_eq!(config.mode, GridMode::Square);
        assert_eq!(config.tile_size, 16);
        assert_eq!(config.tint, TileTint::default());
    }

    #[test]
    fn test_config_rejects_bad_json() {
        assert!(matches!(
            GridConfig::from_json_str("{ mode: "),
            Err(TileMapError::Json(_))
        ));
    }

    #[test]
    fn test_tile_grid_dimensions() {
        let grid = TileGrid::new(vec![0; 12], 4).unwrap();
        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cell_position(6), HexCell::new(2, 1));
    }

    #[test]
    fn test_tile_grid_length_mismatch() {
        assert!(matches!(
            TileGrid::new(vec![0; 10], 4),
            Err(TileMapError::GridLengthMismatch { len: 10, columns: 4 })
        ));
        assert!(TileGrid::new(vec![0; 4], 0).is_err());
    }

    #[test]
    fn test_tile_grid_set_and_sentinel() {
        let mut grid = TileGrid::new(vec![0; 4], 2).unwrap();
        grid.set(3, -1).unwrap();
        assert!(!grid.needs_render(3));
        assert!(grid.needs_render(0));
        assert!(grid.set(4, 1).is_err());
    }
}
