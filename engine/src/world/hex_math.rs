//! Hex Coordinate Math
//!
//! Conversions between the odd-q offset grid used for tile storage, cube
//! coordinates used for distance and rounding, and continuous pixel space.
//!
//! # Layout
//!
//! Columns are staggered: every odd column is shifted down by half a tile.
//! A rendered hex tile is 18 px wide and 16 px tall and columns advance by
//! 14 px, so the hex-to-pixel matrix applied to cube `(q, r)` is:
//!
//! ```text
//! [ 14,  0 ]
//! [  8, 16 ]
//! ```
//!
//! The square-grid alternative maps `(x, y)` to `(16x, 16y)` and is selected
//! through [`GridMode`], which every consumer threads through construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Horizontal pixel stride between adjacent hex columns.
pub const HEX_COLUMN_STRIDE: f32 = 14.0;

/// Vertical pixel offset applied per hex column (half a tile).
pub const HEX_HALF_HEIGHT: f32 = 8.0;

/// Rendered hex tile width in pixels (padded footprint).
pub const HEX_TILE_WIDTH: f32 = 18.0;

/// Rendered tile height in pixels (hex and square).
pub const TILE_HEIGHT: f32 = 16.0;

/// Square tile edge in pixels.
pub const SQUARE_TILE_SIZE: f32 = 16.0;

/// True horizontal stride over padded tile width.
pub const HEX_RATIO: f32 = HEX_COLUMN_STRIDE / HEX_TILE_WIDTH;

/// A grid cell in odd-q offset layout (`x` = column, `y` = row).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCell {
    pub x: i32,
    pub y: i32,
}

impl HexCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell at a flat row-major index.
    pub fn from_index(cell: usize, columns: usize) -> Self {
        Self {
            x: (cell % columns) as i32,
            y: (cell / columns) as i32,
        }
    }

    /// Flat row-major index, or `None` when outside `columns x rows`.
    pub fn to_index(self, columns: usize, rows: usize) -> Option<usize> {
        if self.x < 0 || self.y < 0 {
            return None;
        }
        let (x, y) = (self.x as usize, self.y as usize);
        if x >= columns || y >= rows {
            return None;
        }
        Some(y * columns + x)
    }

    /// Clamp into `[0, columns) x [0, rows)`.
    pub fn clamp_to(self, columns: usize, rows: usize) -> Self {
        let max_x = columns.saturating_sub(1) as i32;
        let max_y = rows.saturating_sub(1) as i32;
        Self {
            x: self.x.clamp(0, max_x),
            y: self.y.clamp(0, max_y),
        }
    }
}

/// Cube coordinate with `q + r + s == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CubeCoord {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl CubeCoord {
    /// Build from `q` and `r`, deriving `s`.
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    pub fn is_valid(&self) -> bool {
        self.q + self.r + self.s == 0
    }
}

/// Offset cell to cube coordinate.
pub fn to_cube(x: i32, y: i32) -> CubeCoord {
    // Floor division keeps negative columns consistent with the stagger.
    CubeCoord::new(x, y - x.div_euclid(2))
}

/// Cube coordinate back to an offset cell.
pub fn from_cube(q: i32, r: i32) -> HexCell {
    HexCell::new(q, r + q.div_euclid(2))
}

/// Pixel position of a hex cell's reference corner.
pub fn hex_to_pixel(x: i32, y: i32) -> Vec2 {
    let cube = to_cube(x, y);
    let (q, r) = (cube.q as f32, cube.r as f32);
    Vec2::new(HEX_COLUMN_STRIDE * q, HEX_HALF_HEIGHT * q + TILE_HEIGHT * r)
}

/// Nearest hex cell to a pixel position (inverse of [`hex_to_pixel`]).
pub fn pixel_to_hex(point: Vec2) -> HexCell {
    // Inverse matrix:
    // [  1/14,    0 ]
    // [ -1/28, 1/16 ]
    let f_q = point.x / HEX_COLUMN_STRIDE;
    let f_r = -point.x / (2.0 * HEX_COLUMN_STRIDE) + point.y / TILE_HEIGHT;

    let cube = cube_round(f_q, f_r);
    from_cube(cube.q, cube.r)
}

/// Rounds fractional cube coordinates to the nearest valid cube triple.
///
/// The component with the largest rounding error is recomputed from the
/// other two. Ties resolve q, then r, then s.
fn cube_round(f_q: f32, f_r: f32) -> CubeCoord {
    let f_s = -f_q - f_r;

    let mut q = round_half_up(f_q);
    let mut r = round_half_up(f_r);
    let mut s = round_half_up(f_s);

    let q_diff = (q - f_q).abs();
    let r_diff = (r - f_r).abs();
    let s_diff = (s - f_s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        q = -r - s;
    } else if r_diff > s_diff {
        r = -q - s;
    } else {
        s = -q - r;
    }

    CubeCoord {
        q: q as i32,
        r: r as i32,
        s: s as i32,
    }
}

/// Nearest integer, halves toward positive infinity.
fn round_half_up(v: f32) -> f32 {
    (v + 0.5).floor()
}

/// Hex step distance between two cells.
pub fn distance(a: HexCell, b: HexCell) -> i32 {
    let ca = to_cube(a.x, a.y);
    let cb = to_cube(b.x, b.y);
    (ca.q - cb.q)
        .abs()
        .max((ca.r - cb.r).abs())
        .max((ca.s - cb.s).abs())
}

/// Euclidean distance between the pixel positions of two cells.
pub fn true_distance(a: HexCell, b: HexCell) -> f32 {
    hex_to_pixel(a.x, a.y).distance(hex_to_pixel(b.x, b.y))
}

/// The six neighbours of a cell in odd-q layout.
pub fn hex_neighbors(cell: HexCell) -> [HexCell; 6] {
    let c = to_cube(cell.x, cell.y);
    [
        (0, -1),
        (1, -1),
        (1, 0),
        (0, 1),
        (-1, 1),
        (-1, 0),
    ]
    .map(|(dq, dr)| from_cube(c.q + dq, c.r + dr))
}

/// Grid geometry mode: staggered hex columns or a plain square grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridMode {
    #[default]
    Hex,
    Square,
}

impl GridMode {
    pub fn is_hex(self) -> bool {
        self == GridMode::Hex
    }

    /// Width of one rendered cell in pixels.
    pub fn cell_width(self) -> f32 {
        match self {
            GridMode::Hex => HEX_TILE_WIDTH,
            GridMode::Square => SQUARE_TILE_SIZE,
        }
    }

    /// Height of one rendered cell in pixels.
    pub fn cell_height(self) -> f32 {
        match self {
            GridMode::Hex => TILE_HEIGHT,
            GridMode::Square => SQUARE_TILE_SIZE,
        }
    }

    /// Column advance relative to the cell width.
    pub fn column_ratio(self) -> f32 {
        match self {
            GridMode::Hex => HEX_RATIO,
            GridMode::Square => 1.0,
        }
    }

    /// Pixel position of a cell's reference corner.
    pub fn cell_to_pixel(self, cell: HexCell) -> Vec2 {
        match self {
            GridMode::Hex => hex_to_pixel(cell.x, cell.y),
            GridMode::Square => Vec2::new(
                cell.x as f32 * SQUARE_TILE_SIZE,
                cell.y as f32 * SQUARE_TILE_SIZE,
            ),
        }
    }

    /// Cell whose reference corner maps nearest to `point`.
    ///
    /// In square mode this is the cell containing the point.
    pub fn pixel_to_cell(self, point: Vec2) -> HexCell {
        match self {
            GridMode::Hex => pixel_to_hex(point),
            GridMode::Square => HexCell::new(
                (point.x / SQUARE_TILE_SIZE).floor() as i32,
                (point.y / SQUARE_TILE_SIZE).floor() as i32,
            ),
        }
    }

    /// Step distance: hex distance, or Chebyshev distance on the square grid.
    pub fn distance(self, a: HexCell, b: HexCell) -> i32 {
        match self {
            GridMode::Hex => distance(a, b),
            GridMode::Square => (a.x - b.x).abs().max((a.y - b.y).abs()),
        }
    }

    /// Euclidean pixel distance between two cells.
    pub fn true_distance(self, a: HexCell, b: HexCell) -> f32 {
        self.cell_to_pixel(a).distance(self.cell_to_pixel(b))
    }

    /// Adjacent cells (6 for hex, 8 for square). May lie outside the grid.
    pub fn neighbors(self, cell: HexCell) -> Vec<HexCell> {
        match self {
            GridMode::Hex => hex_neighbors(cell).to_vec(),
            GridMode::Square => {
                let mut out = Vec::with_capacity(8);
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx != 0 || dy != 0 {
                            out.push(HexCell::new(cell.x + dx, cell.y + dy));
                        }
                    }
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_round_trip() {
        for x in -20..20 {
            for y in -20..20 {
                let c = to_cube(x, y);
                assert!(c.is_valid());
                assert_eq!(from_cube(c.q, c.r), HexCell::new(x, y));
            }
        }
    }

    #[test]
    fn test_pixel_round_trip() {
        for x in -15..15 {
            for y in -15..15 {
                let p = hex_to_pixel(x, y);
                assert_eq!(pixel_to_hex(p), HexCell::new(x, y), "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_hex_to_pixel_stagger() {
        assert_eq!(hex_to_pixel(0, 0), Vec2::new(0.0, 0.0));
        assert_eq!(hex_to_pixel(1, 0), Vec2::new(14.0, 8.0));
        assert_eq!(hex_to_pixel(2, 0), Vec2::new(28.0, 0.0));
        assert_eq!(hex_to_pixel(1, 1), Vec2::new(14.0, 24.0));
        assert_eq!(hex_to_pixel(-1, 0), Vec2::new(-14.0, 8.0));
    }

    #[test]
    fn test_small_offsets_stay_in_cell() {
        for x in 0..6 {
            for y in 0..6 {
                let p = hex_to_pixel(x, y) + Vec2::new(3.0, 2.0);
                assert_eq!(pixel_to_hex(p), HexCell::new(x, y));
            }
        }
    }

    #[test]
    fn test_cube_round_corrects_q() {
        assert_eq!(cube_round(0.45, 0.3), CubeCoord::new(1, 0));
    }

    #[test]
    fn test_cube_round_corrects_r() {
        assert_eq!(cube_round(0.3, 0.45), CubeCoord::new(0, 1));
    }

    #[test]
    fn test_cube_round_corrects_s() {
        assert_eq!(cube_round(0.3, 0.3), CubeCoord::new(0, 0));
    }

    #[test]
    fn test_cube_round_tie_prefers_r_over_q() {
        // q and r errors are equal; q is not strictly larger so r is recomputed.
        assert_eq!(cube_round(0.4, 0.4), CubeCoord::new(0, 1));
    }

    #[test]
    fn test_cube_round_negative_halves_round_up() {
        // -0.5 rounds to 0, not -1, so q and r tie and r is recomputed.
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(cube_round(-0.5, -0.5), CubeCoord::new(0, -1));
    }

    #[test]
    fn test_distance_identity_and_symmetry() {
        let cells = [
            HexCell::new(0, 0),
            HexCell::new(3, 1),
            HexCell::new(-2, 5),
            HexCell::new(7, -4),
        ];
        for a in cells {
            assert_eq!(distance(a, a), 0);
            for b in cells {
                assert_eq!(distance(a, b), distance(b, a));
            }
        }
    }

    #[test]
    fn test_neighbors_are_one_step_away() {
        for cell in [HexCell::new(2, 2), HexCell::new(3, 2), HexCell::new(-1, 0)] {
            for n in hex_neighbors(cell) {
                assert_eq!(distance(cell, n), 1, "{cell:?} -> {n:?}");
            }
        }
    }

    #[test]
    fn test_neighbors_depend_on_column_parity() {
        let even = hex_neighbors(HexCell::new(2, 2));
        assert!(even.contains(&HexCell::new(3, 1)));
        assert!(even.contains(&HexCell::new(3, 2)));

        let odd = hex_neighbors(HexCell::new(3, 2));
        assert!(odd.contains(&HexCell::new(4, 2)));
        assert!(odd.contains(&HexCell::new(4, 3)));
    }

    #[test]
    fn test_true_distance_adjacent() {
        let d = true_distance(HexCell::new(0, 0), HexCell::new(0, 1));
        assert_eq!(d, 16.0);
        let diag = true_distance(HexCell::new(0, 0), HexCell::new(1, 0));
        assert!((diag - (14.0f32 * 14.0 + 8.0 * 8.0).sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_square_mode_mapping() {
        let mode = GridMode::Square;
        assert_eq!(mode.cell_to_pixel(HexCell::new(2, 3)), Vec2::new(32.0, 48.0));
        assert_eq!(mode.pixel_to_cell(Vec2::new(33.0, 63.9)), HexCell::new(2, 3));
        assert_eq!(mode.distance(HexCell::new(0, 0), HexCell::new(3, -2)), 3);
        assert_eq!(mode.neighbors(HexCell::new(1, 1)).len(), 8);
    }

    #[test]
    fn test_clamp_and_index() {
        let cell = HexCell::new(-3, 9).clamp_to(4, 4);
        assert_eq!(cell, HexCell::new(0, 3));
        assert_eq!(cell.to_index(4, 4), Some(12));
        assert_eq!(HexCell::new(4, 0).to_index(4, 4), None);
        assert_eq!(HexCell::from_index(5, 4), HexCell::new(1, 1));
    }
}
