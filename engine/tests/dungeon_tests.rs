//! Dungeon Tests - Terrain Adapter and Hit-Testing
//!
//! Tests for the dungeon tile map: neighbourhood refresh on terrain edits,
//! dirty regions, pixel queries and the wall-assist hook.

use std::cell::Cell;

use glam::Vec2;
use hex_tilemap_engine::dungeon::{
    DISCOVER_FADE_SECONDS, DungeonTileMap, ResolveContext, TileVisualResolver, WallAssistContext,
};
use hex_tilemap_engine::render::{MirrorBuffer, TileAtlas, TileUpload};
use hex_tilemap_engine::world::{GridConfig, HexCell};

const FLOOR: i32 = 0;
const WALL: i32 = 1;
const CHASM: i32 = 2;

/// Walls render differently when a floor cell sits directly below them.
#[derive(Default)]
struct WallResolver {
    calls: Cell<usize>,
}

impl TileVisualResolver for WallResolver {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> i32 {
        self.calls.set(self.calls.get() + 1);
        match ctx.terrain {
            CHASM => -1,
            WALL => {
                let below = HexCell::new(ctx.cell().x, ctx.cell().y + 1);
                if ctx.terrain_at(below) == Some(FLOOR) { 3 } else { 1 }
            }
            other => other,
        }
    }

    fn is_wall_like(&self, _pos: usize, terrain: i32) -> bool {
        terrain == WALL
    }
}

fn snap_below(ctx: &WallAssistContext<'_>) -> usize {
    ctx.cell + ctx.columns
}

fn snap_far(_ctx: &WallAssistContext<'_>) -> usize {
    usize::MAX
}

fn atlas(config: &GridConfig) -> TileAtlas {
    let (w, h) = (config.cell_width() as u32, config.cell_height() as u32);
    TileAtlas::from_grid(w * 4, h * 4, w, h).unwrap()
}

fn level(config: GridConfig, columns: usize, rows: usize) -> DungeonTileMap<WallResolver> {
    let mut map = DungeonTileMap::new(atlas(&config), config, WallResolver::default()).unwrap();
    map.set_grid(vec![FLOOR; columns * rows], columns).unwrap();
    map
}

// ============================================================================
// Terrain Refresh Tests
// ============================================================================

#[test]
fn test_set_grid_resolves_every_cell() {
    let map = level(GridConfig::hex(), 6, 5);
    assert_eq!(map.resolver().calls.get(), 30);
    assert!(map.tiles().grid().as_slice().iter().all(|&v| v == FLOOR));
}

#[test]
fn test_hex_interior_refreshes_seven_cells() {
    let mut map = level(GridConfig::hex(), 6, 6);
    let before = map.resolver().calls.get();
    map.mark_cell_dirty(2 * 6 + 2).unwrap();
    assert_eq!(map.resolver().calls.get() - before, 7);
}

#[test]
fn test_square_interior_refreshes_nine_cells() {
    let mut map = level(GridConfig::square(), 6, 6);
    let before = map.resolver().calls.get();
    map.mark_cell_dirty(2 * 6 + 2).unwrap();
    assert_eq!(map.resolver().calls.get() - before, 9);
}

#[test]
fn test_border_cell_refreshes_itself_only() {
    let mut map = level(GridConfig::hex(), 6, 6);
    let mut buffer = MirrorBuffer::new();
    map.draw(&mut buffer).unwrap();

    let before = map.resolver().calls.get();
    map.mark_cell_dirty(3).unwrap();
    assert_eq!(map.resolver().calls.get() - before, 1);
    assert_eq!(
        map.draw(&mut buffer).unwrap().upload,
        TileUpload::Range { start: 48, end: 64 }
    );
}

#[test]
fn test_set_terrain_updates_visuals() {
    let mut map = level(GridConfig::hex(), 5, 5);
    map.set_terrain(12, CHASM).unwrap();
    assert_eq!(map.terrain()[12], CHASM);
    assert_eq!(map.tiles().tile(12), Some(-1));

    let mut buffer = MirrorBuffer::new();
    map.draw(&mut buffer).unwrap();
    assert!(buffer.data().unwrap()[12 * 16..13 * 16].iter().all(|&f| f == 0.0));
}

#[test]
fn test_neighbour_edit_changes_wall_visual() {
    let mut map = level(GridConfig::hex(), 5, 5);
    // Wall at (2, 1) above floor at (2, 2).
    map.set_terrain(7, WALL).unwrap();
    assert_eq!(map.tiles().tile(7), Some(3));

    let mut buffer = MirrorBuffer::new();
    map.draw(&mut buffer).unwrap();

    map.set_terrain(12, WALL).unwrap();
    assert_eq!(map.tiles().tile(7), Some(1));
    assert_eq!(map.tiles().tile(12), Some(3));

    // The wall's quad is inside the uploaded range.
    match map.draw(&mut buffer).unwrap().upload {
        TileUpload::Range { start, end } => assert!(start <= 7 * 16 && 8 * 16 <= end),
        other => panic!("unexpected upload {other:?}"),
    }
    let uploaded = &buffer.data().unwrap()[7 * 16..8 * 16];
    assert_eq!(uploaded, &map.tiles().vertices()[7 * 16..8 * 16]);
}

#[test]
fn test_border_edit_needs_update_map() {
    let mut map = level(GridConfig::square(), 4, 4);
    // Wall at (1, 2) above the bottom border cell (1, 3).
    map.set_terrain(9, WALL).unwrap();
    assert_eq!(map.tiles().tile(9), Some(3));

    // Border cells only refresh themselves.
    map.set_terrain(13, WALL).unwrap();
    assert_eq!(map.tiles().tile(9), Some(3));

    map.update_map().unwrap();
    assert_eq!(map.tiles().tile(9), Some(1));
}

#[test]
fn test_update_map_requests_full_upload() {
    let mut map = level(GridConfig::hex(), 4, 4);
    let mut buffer = MirrorBuffer::new();
    map.draw(&mut buffer).unwrap();

    map.update_map().unwrap();
    assert_eq!(map.draw(&mut buffer).unwrap().upload, TileUpload::Full);
}

#[test]
fn test_mismatched_terrain_length() {
    let config = GridConfig::hex();
    let mut map = DungeonTileMap::new(atlas(&config), config, WallResolver::default()).unwrap();
    assert!(map.set_grid(vec![0; 7], 3).is_err());
    assert!(map.terrain().is_empty());
}

// ============================================================================
// Geometry Tests
// ============================================================================

#[test]
fn test_pixel_queries_hex() {
    let map = level(GridConfig::hex(), 4, 4);
    // Cell 5 is (1, 1).
    assert_eq!(map.pixel_top_left_of(5), Vec2::new(14.0, 24.0));
    assert_eq!(map.pixel_center_of(5), Vec2::new(23.0, 32.0));
    assert_eq!(map.raised_pixel_center_of(0).x, 9.0);
}

#[test]
fn test_pixel_queries_square() {
    let map = level(GridConfig::square(), 4, 4);
    assert_eq!(map.pixel_top_left_of(5), Vec2::new(16.0, 16.0));
    assert_eq!(map.pixel_center_of(5), Vec2::new(24.0, 24.0));
    assert_eq!(map.cell_at(Vec2::new(31.0, 17.0), false), Some(5));
}

#[test]
fn test_cell_at_inverts_center_everywhere() {
    for config in [GridConfig::hex(), GridConfig::square()] {
        let map = level(config, 7, 5);
        for cell in 0..35 {
            assert_eq!(map.cell_at(map.pixel_center_of(cell), false), Some(cell));
        }
    }
}

#[test]
fn test_cell_at_clamps_outside_points() {
    let map = level(GridConfig::hex(), 4, 4);
    assert_eq!(map.cell_at(Vec2::new(1000.0, -50.0), false), Some(3));
    assert_eq!(map.cell_at(Vec2::new(-50.0, 1000.0), false), Some(12));
}

// ============================================================================
// Wall Assist Tests
// ============================================================================

#[test]
fn test_wall_assist_applies_to_wall_like_cells() {
    let mut map = level(GridConfig::hex(), 4, 4).with_wall_assist(snap_below);
    map.set_terrain(5, WALL).unwrap();
    let center = map.pixel_center_of(5);

    assert_eq!(map.cell_at(center, false), Some(5));
    assert_eq!(map.cell_at(center, true), Some(9));

    // Floor cells are never nudged.
    let floor = map.pixel_center_of(6);
    assert_eq!(map.cell_at(floor, true), Some(6));
}

#[test]
fn test_wall_assist_result_clamped() {
    let mut map = level(GridConfig::hex(), 4, 4).with_wall_assist(snap_far);
    map.set_terrain(15, WALL).unwrap();
    assert_eq!(map.cell_at(map.pixel_center_of(15), true), Some(15));
}

// ============================================================================
// Discover Tests
// ============================================================================

#[test]
fn test_discover_uses_old_visual() {
    let map = level(GridConfig::hex(), 4, 4);
    let sprite = map.discover(5, 2 + 4).unwrap();
    assert_eq!(sprite.position, map.pixel_top_left_of(5));
    assert_eq!(sprite.fade_seconds, DISCOVER_FADE_SECONDS);
    assert_eq!(sprite.fade_seconds, 0.6);

    // Chasms are not rendered, so nothing fades.
    assert!(map.discover(5, CHASM).is_none());
}
