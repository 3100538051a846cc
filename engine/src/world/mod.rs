//! World Module
//!
//! Grid-space types: hex/square coordinate math, grid configuration,
//! tile index storage and dirty-cell rectangles.

pub mod grid;
pub mod hex_math;
pub mod rect;

pub use grid::{GridConfig, TileGrid, TileTint};
pub use hex_math::{CubeCoord, GridMode, HexCell};
pub use rect::DirtyRect;
