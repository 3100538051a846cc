//! Hex Tile Map Library
//!
//! Rendering core for 2D tile maps on a staggered hex grid (or a plain
//! square grid), built on wgpu.
//!
//! # Modules
//!
//! - [`world`] - Hex coordinate math, grid configuration and dirty rectangles
//! - [`render`] - Atlas hexagonizing, tile map renderer and GPU pipeline
//! - [`dungeon`] - Terrain-driven tile map with neighbourhood refresh and hit-testing
//! - [`error`] - Error type shared by every module
//!
//! # Example
//!
//! ```ignore
//! use hex_tilemap_engine::dungeon::{DungeonTileMap, ResolveContext};
//! use hex_tilemap_engine::render::{Hexagonizer, MirrorBuffer};
//! use hex_tilemap_engine::world::GridConfig;
//!
//! // Convert a 16x16 square atlas to 18x16 hex tiles
//! let source = image::open("tiles.png")?.to_rgba8();
//! let (hex_image, atlas) = Hexagonizer::new(16, 18)?.build_atlas(&source)?;
//!
//! // Terrain value N draws atlas frame N
//! fn resolver(ctx: &ResolveContext<'_>) -> i32 {
//!     ctx.terrain
//! }
//! let mut level = DungeonTileMap::new(atlas, GridConfig::hex(), resolver)?;
//! level.set_grid(vec![0; 32 * 32], 32)?;
//!
//! // Edit terrain and flush only the affected cells
//! level.set_terrain(33, 4)?;
//! let mut buffer = MirrorBuffer::new();
//! let draw = level.draw(&mut buffer)?;
//! ```

pub mod dungeon;
pub mod error;
pub mod render;
pub mod world;

pub use error::{Result, TileMapError};
// Re-export world types for convenience
pub use world::{GridConfig, GridMode, HexCell};
