//! Tile Visual Resolution Hooks
//!
//! Game-side policy plugged into the dungeon tile map: which atlas frame a
//! terrain value renders as, which terrain counts as wall-like, and how a
//! tap on a wall-like cell may be nudged ("wall assist").

use glam::Vec2;

use crate::world::{GridMode, HexCell};

/// One cell being resolved, with read access to the live terrain map.
#[derive(Clone, Copy, Debug)]
pub struct ResolveContext<'a> {
    /// Flat cell index
    pub pos: usize,
    /// Terrain value to render at `pos`
    pub terrain: i32,
    /// Current terrain of every cell
    pub map: &'a [i32],
    pub columns: usize,
    pub rows: usize,
    pub mode: GridMode,
    pub flat: bool,
}

impl ResolveContext<'_> {
    /// Grid position of the resolved cell.
    pub fn cell(&self) -> HexCell {
        HexCell::from_index(self.pos, self.columns.max(1))
    }

    /// Terrain at another grid position, `None` off the map.
    pub fn terrain_at(&self, cell: HexCell) -> Option<i32> {
        let index = cell.to_index(self.columns, self.rows)?;
        self.map.get(index).copied()
    }
}

/// Picks the visual tile index for a terrain value.
///
/// Variants may depend on neighbouring terrain through the context.
/// Negative results mean "not rendered".
pub trait TileVisualResolver {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> i32;

    /// Whether taps on this cell are candidates for wall assist.
    fn is_wall_like(&self, _pos: usize, _terrain: i32) -> bool {
        false
    }
}

impl<F> TileVisualResolver for F
where
    F: Fn(&ResolveContext<'_>) -> i32,
{
    fn resolve(&self, ctx: &ResolveContext<'_>) -> i32 {
        self(ctx)
    }
}

/// Everything a wall-assist policy may look at.
#[derive(Clone, Copy, Debug)]
pub struct WallAssistContext<'a> {
    /// Cell the tap resolved to (already clamped, wall-like)
    pub cell: usize,
    /// Tap position in map pixels
    pub point: Vec2,
    pub columns: usize,
    pub rows: usize,
    pub mode: GridMode,
    /// Logical terrain of every cell
    pub terrain: &'a [i32],
}

/// Tap correction near wall bases. Returns the cell to select.
pub trait WallAssist {
    fn snap(&self, ctx: &WallAssistContext<'_>) -> usize;
}

impl<F> WallAssist for F
where
    F: Fn(&WallAssistContext<'_>) -> usize,
{
    fn snap(&self, ctx: &WallAssistContext<'_>) -> usize {
        self(ctx)
    }
}

/// Keeps the resolved cell unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoWallAssist;

impl WallAssist for NoWallAssist {
    fn snap(&self, ctx: &WallAssistContext<'_>) -> usize {
        ctx.cell
    }
}
