//! Tile Map Errors
//!
//! Configuration problems (wrong atlas dimensions, wrong tile size, grid
//! length not matching its column count) are reported as values that name
//! the offending dimensions. Upload failures are terminal for the frame.

use std::fmt;

/// Errors raised by the tile-map core.
#[derive(Debug)]
pub enum TileMapError {
    /// Source atlas width or height is not a multiple of the tile size.
    AtlasNotTileAligned {
        width: u32,
        height: u32,
        tile_size: u32,
    },
    /// The hexagonizer only supports the 16 -> 18 transform.
    UnsupportedTileSize { tile_size: u32, hex_width: u32 },
    /// Grid index array length is not `columns * rows`.
    GridLengthMismatch { len: usize, columns: usize },
    /// The atlas has no frame at index 0, so the cell size is unknown.
    EmptyAtlas,
    /// Atlas cell size differs from the configured cell size.
    CellSizeMismatch {
        expected: (f32, f32),
        actual: (f32, f32),
    },
    /// A cell index outside `0..size`.
    CellOutOfRange { cell: usize, size: usize },
    /// A partial upload range that does not fit the vertex buffer.
    UploadOutOfRange { start: usize, end: usize, len: usize },
    /// Backend-reported upload failure.
    Upload(String),
    /// Image decode/encode error.
    Image(image::ImageError),
    /// Standard I/O error.
    Io(std::io::Error),
    /// JSON (configuration) error.
    Json(serde_json::Error),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, TileMapError>;

impl fmt::Display for TileMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileMapError::AtlasNotTileAligned {
                width,
                height,
                tile_size,
            } => write!(
                f,
                "atlas {width}x{height} is not a multiple of the {tile_size}px tile size"
            ),
            TileMapError::UnsupportedTileSize {
                tile_size,
                hex_width,
            } => write!(
                f,
                "unsupported tile transform {tile_size}->{hex_width}, only 16->18 is supported"
            ),
            TileMapError::GridLengthMismatch { len, columns } => write!(
                f,
                "grid of {len} cells cannot be split into rows of {columns} columns"
            ),
            TileMapError::EmptyAtlas => write!(f, "atlas has no frame at index 0"),
            TileMapError::CellSizeMismatch { expected, actual } => write!(
                f,
                "atlas cell is {}x{}, expected {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            TileMapError::CellOutOfRange { cell, size } => {
                write!(f, "cell {cell} is outside a grid of {size} cells")
            }
            TileMapError::UploadOutOfRange { start, end, len } => write!(
                f,
                "upload range {start}..{end} exceeds vertex buffer of {len} floats"
            ),
            TileMapError::Upload(msg) => write!(f, "vertex upload failed: {msg}"),
            TileMapError::Image(e) => write!(f, "image error: {e}"),
            TileMapError::Io(e) => write!(f, "IO error: {e}"),
            TileMapError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for TileMapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TileMapError::Image(e) => Some(e),
            TileMapError::Io(e) => Some(e),
            TileMapError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for TileMapError {
    fn from(e: image::ImageError) -> Self {
        TileMapError::Image(e)
    }
}

impl From<std::io::Error> for TileMapError {
    fn from(e: std::io::Error) -> Self {
        TileMapError::Io(e)
    }
}

impl From<serde_json::Error> for TileMapError {
    fn from(e: serde_json::Error) -> Self {
        TileMapError::Json(e)
    }
}
