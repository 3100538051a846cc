//! Render Module
//!
//! Tile atlas preparation and the tile map renderer: hexagonizing square
//! atlases, mapping tile indices to UV frames, building per-cell quads and
//! keeping the wgpu vertex buffer in sync with dirty cells.

pub mod atlas;
pub mod dirty_tracker;
pub mod gpu_buffer;
pub mod hexagonizer;
pub mod pixel_buffer;
pub mod tile_map;
pub mod tile_pipeline;
pub mod tile_vertex;

// Re-export commonly used types for convenience
pub use atlas::{TextureAtlasSource, TileAtlas, UvRect};
pub use dirty_tracker::{DirtyFlush, DirtyHandle};
pub use gpu_buffer::{GpuBufferTarget, MirrorBuffer, UploadRecord, WgpuTileBuffer};
pub use hexagonizer::{Hexagonizer, hex_mask};
pub use pixel_buffer::PixelBuffer;
pub use tile_map::{TileDraw, TileMap, TileUpload};
pub use tile_pipeline::{AtlasTexture, TILE_MAP_SHADER, TileMapPipeline, TileMapUniforms};
pub use tile_vertex::{TileQuad, TileVertex, quad_indices, tile_vertex_layout};
