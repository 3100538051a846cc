//! Dungeon Module
//!
//! Binds the generic tile map renderer to a live dungeon level: terrain
//! values resolve to visual tiles, terrain edits refresh neighbourhoods,
//! and map pixels resolve back to cells.

pub mod resolver;
pub mod tile_map;

pub use resolver::{
    NoWallAssist, ResolveContext, TileVisualResolver, WallAssist, WallAssistContext,
};
pub use tile_map::{DISCOVER_FADE_SECONDS, DiscoverSprite, DungeonTileMap};
