//! Dungeon Tile Map
//!
//! Specializes [`TileMap`] for a live dungeon level. Two parallel arrays
//! cover the same cells:
//! - `terrain`: logical terrain values written by game logic,
//! - the renderer's visual tile indices, derived through a
//!   [`TileVisualResolver`].
//!
//! A terrain change can alter how neighbouring tiles draw their edges, so
//! marking a cell dirty re-resolves its whole neighbourhood (7 cells on a
//! hex grid, 3x3 on a square grid) and dirties the bounding box around it.

use glam::Vec2;

use super::resolver::{
    NoWallAssist, ResolveContext, TileVisualResolver, WallAssist, WallAssistContext,
};
use crate::error::{Result, TileMapError};
use crate::render::atlas::{TextureAtlasSource, TileAtlas, UvRect};
use crate::render::dirty_tracker::DirtyHandle;
use crate::render::gpu_buffer::GpuBufferTarget;
use crate::render::tile_map::{TileDraw, TileMap};
use crate::world::{GridConfig, HexCell};

/// Seconds a discovered tile takes to fade out.
pub const DISCOVER_FADE_SECONDS: f32 = 0.6;

/// Fraction of the tile height used for the raised (wall-top) center.
const RAISED_CENTER_FRACTION: f32 = 0.1;

/// Standalone sprite showing a tile's previous look while it fades out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscoverSprite {
    /// Top-left pixel position
    pub position: Vec2,
    /// Atlas frame of the old visual
    pub frame: UvRect,
    /// Fade-out duration in seconds
    pub fade_seconds: f32,
}

/// Tile map bound to dungeon terrain.
pub struct DungeonTileMap<R, A: TextureAtlasSource = TileAtlas> {
    tiles: TileMap<A>,
    resolver: R,
    terrain: Vec<i32>,
    wall_assist: Box<dyn WallAssist + Send + Sync>,
}

impl<R: TileVisualResolver, A: TextureAtlasSource> DungeonTileMap<R, A> {
    pub fn new(atlas: A, config: GridConfig, resolver: R) -> Result<Self> {
        Ok(Self {
            tiles: TileMap::new(atlas, config)?,
            resolver,
            terrain: Vec::new(),
            wall_assist: Box::new(NoWallAssist),
        })
    }

    /// Replace the wall-assist policy.
    pub fn with_wall_assist(mut self, policy: impl WallAssist + Send + Sync + 'static) -> Self {
        self.wall_assist = Box::new(policy);
        self
    }

    /// Adopt a terrain array and derive every visual index from it.
    pub fn set_grid(&mut self, terrain: Vec<i32>, columns: usize) -> Result<()> {
        let rows = if columns > 0 { terrain.len() / columns } else { 0 };
        let mode = self.tiles.config().mode;
        let visual = terrain
            .iter()
            .enumerate()
            .map(|(pos, &value)| {
                self.resolver.resolve(&ResolveContext {
                    pos,
                    terrain: value,
                    map: &terrain,
                    columns,
                    rows,
                    mode,
                    flat: false,
                })
            })
            .collect();
        self.tiles.set_grid(visual, columns)?;
        self.terrain = terrain;
        Ok(())
    }

    /// Re-resolve every cell and request a full rebuild.
    pub fn update_map(&mut self) -> Result<()> {
        for pos in 0..self.terrain.len() {
            self.refresh_visual(pos)?;
        }
        self.tiles.mark_all_dirty();
        Ok(())
    }

    /// Write one terrain value and refresh its neighbourhood.
    pub fn set_terrain(&mut self, cell: usize, value: i32) -> Result<()> {
        let size = self.terrain.len();
        let slot = self
            .terrain
            .get_mut(cell)
            .ok_or(TileMapError::CellOutOfRange { cell, size })?;
        *slot = value;
        self.mark_cell_dirty(cell)
    }

    /// Re-resolve the cell and its neighbours and dirty them.
    ///
    /// Cells on the map border only refresh themselves.
    pub fn mark_cell_dirty(&mut self, cell: usize) -> Result<()> {
        let size = self.terrain.len();
        if cell >= size {
            return Err(TileMapError::CellOutOfRange { cell, size });
        }

        if !self.inside_map(cell) {
            self.refresh_visual(cell)?;
            self.tiles.mark_cell_dirty(cell);
            return Ok(());
        }

        let (columns, rows) = (self.columns(), self.rows());
        let mode = self.tiles.config().mode;
        let center = HexCell::from_index(cell, columns);
        self.refresh_visual(cell)?;
        for neighbor in mode.neighbors(center) {
            if let Some(pos) = neighbor.to_index(columns, rows) {
                self.refresh_visual(pos)?;
            }
        }

        // Staggered columns shift neighbours by half a row, so cover the
        // full box around the cell.
        self.tiles.mark_position_dirty(center.x - 1, center.y - 1);
        self.tiles.mark_position_dirty(center.x + 1, center.y + 1);
        Ok(())
    }

    fn refresh_visual(&mut self, pos: usize) -> Result<()> {
        let size = self.terrain.len();
        let terrain = *self
            .terrain
            .get(pos)
            .ok_or(TileMapError::CellOutOfRange { cell: pos, size })?;
        let visual = self.resolver.resolve(&self.resolve_context(pos, terrain));
        self.tiles.set_tile(pos, visual)
    }

    /// Context for resolving `pos` as `terrain` against the live map.
    fn resolve_context(&self, pos: usize, terrain: i32) -> ResolveContext<'_> {
        ResolveContext {
            pos,
            terrain,
            map: &self.terrain,
            columns: self.columns(),
            rows: self.rows(),
            mode: self.tiles.config().mode,
            flat: false,
        }
    }

    /// Whether the cell is off the outer border of the map.
    pub fn inside_map(&self, cell: usize) -> bool {
        let (columns, rows) = (self.columns(), self.rows());
        if columns == 0 || cell >= self.terrain.len() {
            return false;
        }
        let (x, y) = (cell % columns, cell / columns);
        x > 0 && x + 1 < columns && y > 0 && y + 1 < rows
    }

    /// Cell under a map pixel, clamped into the grid.
    ///
    /// With `wall_assist` set, a tap resolving to a wall-like cell is passed
    /// to the wall-assist policy. Returns `None` before a grid is assigned.
    pub fn cell_at(&self, point: Vec2, wall_assist: bool) -> Option<usize> {
        let (columns, rows) = (self.columns(), self.rows());
        if columns == 0 || rows == 0 {
            return None;
        }

        let mode = self.tiles.config().mode;
        let tap = if mode.is_hex() {
            // Hex reference points sit at the tile corner; taps are relative
            // to the tile center.
            point - self.half_cell()
        } else {
            point
        };

        let cell = mode.pixel_to_cell(tap).clamp_to(columns, rows);
        let index = cell.to_index(columns, rows)?;

        let wall_like = self
            .terrain
            .get(index)
            .is_some_and(|&terrain| self.resolver.is_wall_like(index, terrain));
        if wall_assist && wall_like {
            let ctx = WallAssistContext {
                cell: index,
                point,
                columns,
                rows,
                mode,
                terrain: &self.terrain,
            };
            let snapped = self.wall_assist.snap(&ctx);
            return Some(snapped.min(self.terrain.len().saturating_sub(1)));
        }
        Some(index)
    }

    /// Top-left pixel of a cell's tile.
    pub fn pixel_top_left_of(&self, cell: usize) -> Vec2 {
        let pos = HexCell::from_index(cell, self.columns().max(1));
        self.tiles.config().mode.cell_to_pixel(pos)
    }

    /// Pixel center of a cell's tile.
    pub fn pixel_center_of(&self, cell: usize) -> Vec2 {
        self.pixel_top_left_of(cell) + self.half_cell()
    }

    /// Point near the top of a cell, where raised sprites anchor.
    pub fn raised_pixel_center_of(&self, cell: usize) -> Vec2 {
        let config = self.tiles.config();
        self.pixel_top_left_of(cell)
            + Vec2::new(
                0.5 * config.cell_width(),
                RAISED_CENTER_FRACTION * config.cell_height(),
            )
    }

    fn half_cell(&self) -> Vec2 {
        let config = self.tiles.config();
        Vec2::new(0.5 * config.cell_width(), 0.5 * config.cell_height())
    }

    /// Fading sprite of what `pos` looked like with `old_terrain`.
    pub fn discover(&self, pos: usize, old_terrain: i32) -> Option<DiscoverSprite> {
        let visual = self
            .resolver
            .resolve(&self.resolve_context(pos, old_terrain));
        if visual < 0 {
            return None;
        }
        let frame = self.tiles.atlas().get(visual)?;
        Some(DiscoverSprite {
            position: self.pixel_top_left_of(pos),
            frame,
            fade_seconds: DISCOVER_FADE_SECONDS,
        })
    }

    /// Flush dirty cells and produce the draw command.
    pub fn draw<B: GpuBufferTarget>(&mut self, target: &mut B) -> Result<TileDraw> {
        self.tiles.draw(target)
    }

    pub fn dirty_handle(&self) -> DirtyHandle {
        self.tiles.dirty_handle()
    }

    pub fn terrain(&self) -> &[i32] {
        &self.terrain
    }

    pub fn tiles(&self) -> &TileMap<A> {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut TileMap<A> {
        &mut self.tiles
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn columns(&self) -> usize {
        self.tiles.grid().columns()
    }

    pub fn rows(&self) -> usize {
        self.tiles.grid().rows()
    }
}
