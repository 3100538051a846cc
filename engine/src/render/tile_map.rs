//! Tile Map Renderer
//!
//! Turns a grid of tile indices into one quad per cell and keeps a GPU
//! vertex buffer in sync with it, regenerating only the cells inside the
//! dirty rectangle.
//!
//! # Frame protocol
//!
//! 1. Producers call [`TileMap::mark_cell_dirty`] (or mark through a
//!    [`DirtyHandle`] from another thread).
//! 2. [`TileMap::draw`] swaps the accumulated rectangle out, rebuilds the
//!    quads inside it and uploads:
//!    - the whole storage on the first draw (buffer creation),
//!    - the whole storage again after [`TileMap::mark_all_dirty`],
//!    - otherwise only the float range `[first_cell * 16, (last_cell + 1) * 16)`.
//! 3. The returned [`TileDraw`] is recorded by the pipeline with the atlas
//!    texture bound.
//!
//! # Example
//!
//! ```ignore
//! use hex_tilemap_engine::render::{MirrorBuffer, TileAtlas, TileMap};
//! use hex_tilemap_engine::world::GridConfig;
//!
//! let atlas = TileAtlas::from_grid(72, 64, 18, 16)?;
//! let mut map = TileMap::new(atlas, GridConfig::hex())?;
//! map.set_grid(vec![0; 16], 4)?;
//!
//! let mut buffer = MirrorBuffer::new();
//! let draw = map.draw(&mut buffer)?;
//! assert_eq!(draw.quad_count, 16);
//! ```

use glam::Vec2;

use super::atlas::{TextureAtlasSource, TileAtlas, UvRect};
use super::dirty_tracker::DirtyHandle;
use super::gpu_buffer::GpuBufferTarget;
use super::tile_vertex::{FLOATS_PER_QUAD, INDICES_PER_QUAD, TileQuad};
use crate::error::{Result, TileMapError};
use crate::world::{DirtyRect, GridConfig, TileGrid};

/// Tolerance when comparing atlas cell sizes with the configuration.
const CELL_SIZE_EPSILON: f32 = 0.01;

/// Upload issued by one [`TileMap::draw`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileUpload {
    /// Nothing was dirty.
    None,
    /// First upload: the buffer was created from the full storage.
    Created,
    /// Full re-upload after a full rebuild request.
    Full,
    /// Partial re-upload of the float range `start..end`.
    Range { start: usize, end: usize },
}

/// Draw command produced by [`TileMap::draw`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileDraw {
    /// Quads to draw (every cell, rendered or not)
    pub quad_count: usize,
    /// Indices to draw from the shared quad index buffer
    pub index_count: u32,
    /// Upload performed before drawing
    pub upload: TileUpload,
}

/// Grid of tile indices rendered as fixed-slot quads.
pub struct TileMap<A: TextureAtlasSource = TileAtlas> {
    atlas: A,
    config: GridConfig,
    cell_width: f32,
    cell_height: f32,
    grid: TileGrid,
    quads: Vec<TileQuad>,
    dirty: DirtyHandle,
    buffer_created: bool,
    width: f32,
    height: f32,
}

impl<A: TextureAtlasSource> TileMap<A> {
    /// Create a renderer over `atlas`.
    ///
    /// The cell size is read from frame 0 and must match the configured
    /// cell size (18x16 in hex mode, 16x16 in square mode).
    pub fn new(atlas: A, config: GridConfig) -> Result<Self> {
        let frame = atlas.get(0).ok_or(TileMapError::EmptyAtlas)?;
        let actual = (atlas.cell_width(&frame), atlas.cell_height(&frame));
        let expected = (config.cell_width(), config.cell_height());

        if (actual.0 - expected.0).abs() > CELL_SIZE_EPSILON
            || (actual.1 - expected.1).abs() > CELL_SIZE_EPSILON
        {
            log::warn!(
                "TileMap: atlas cell {}x{} does not match {:?} grid cell {}x{}",
                actual.0,
                actual.1,
                config.mode,
                expected.0,
                expected.1
            );
            return Err(TileMapError::CellSizeMismatch { expected, actual });
        }

        Ok(Self {
            atlas,
            config,
            cell_width: actual.0,
            cell_height: actual.1,
            grid: TileGrid::default(),
            quads: Vec::new(),
            dirty: DirtyHandle::new(),
            buffer_created: false,
            width: 0.0,
            height: 0.0,
        })
    }

    /// Replace the tile-index array.
    ///
    /// Sizes the quad storage to the cell count, dirties the whole grid and
    /// requests a full upload on the next draw.
    pub fn set_grid(&mut self, indices: Vec<i32>, columns: usize) -> Result<()> {
        let grid = TileGrid::new(indices, columns)?;

        if grid.len() != self.quads.len() {
            // A different cell count needs a differently sized buffer.
            self.buffer_created = false;
            self.quads = vec![TileQuad::DEGENERATE; grid.len()];
        }

        let (columns, rows) = (grid.columns(), grid.rows());
        self.width = self.config.column_stride() * columns.saturating_sub(1) as f32
            + if columns > 0 { self.cell_width } else { 0.0 };
        self.height = self.cell_height * rows as f32;
        if self.config.mode.is_hex() && columns > 1 {
            self.height += 0.5 * self.cell_height;
        }

        self.grid = grid;
        self.dirty.reset_grid(columns, rows);

        log::debug!(
            "TileMap: grid {}x{} ({} cells), {}x{} px",
            columns,
            rows,
            self.grid.len(),
            self.width,
            self.height
        );
        Ok(())
    }

    /// Overwrite one cell's tile index without marking it dirty.
    pub fn set_tile(&mut self, cell: usize, index: i32) -> Result<()> {
        self.grid.set(cell, index)
    }

    pub fn tile(&self, cell: usize) -> Option<i32> {
        self.grid.get(cell)
    }

    /// Union one cell into the dirty rectangle.
    pub fn mark_cell_dirty(&self, cell: usize) {
        self.dirty.mark_cell(cell);
    }

    /// Union a `(column, row)` position into the dirty rectangle.
    pub fn mark_position_dirty(&self, x: i32, y: i32) {
        self.dirty.mark_position(x, y);
    }

    /// Dirty the whole grid and request a full re-upload.
    pub fn mark_all_dirty(&self) {
        self.dirty.mark_all();
    }

    /// Handle for marking cells from other threads.
    pub fn dirty_handle(&self) -> DirtyHandle {
        self.dirty.clone()
    }

    /// Flush dirty cells to `target` and return the draw command.
    ///
    /// Without dirty cells no upload happens. A failed upload is returned
    /// as an error and its region stays queued for the next frame.
    pub fn draw<B: GpuBufferTarget>(&mut self, target: &mut B) -> Result<TileDraw> {
        let flush = self.dirty.take();
        let mut upload = TileUpload::None;

        if !flush.is_empty() && !self.grid.is_empty() {
            if let Some((first, last)) = self.update_vertices(&flush.rect) {
                match self.upload(target, flush.full_rebuild, first, last) {
                    Ok(done) => upload = done,
                    Err(e) => {
                        self.dirty.mark_rect(&flush.rect);
                        if flush.full_rebuild {
                            self.dirty.mark_all();
                        }
                        return Err(e);
                    }
                }
            }
        }

        let quad_count = if self.buffer_created { self.grid.len() } else { 0 };
        Ok(TileDraw {
            quad_count,
            index_count: (quad_count * INDICES_PER_QUAD) as u32,
            upload,
        })
    }

    fn upload<B: GpuBufferTarget>(
        &mut self,
        target: &mut B,
        full_rebuild: bool,
        first: usize,
        last: usize,
    ) -> Result<TileUpload> {
        let data: &[f32] = bytemuck::cast_slice(&self.quads);

        if !self.buffer_created {
            target.create(data)?;
            self.buffer_created = true;
            log::debug!("TileMap: created vertex buffer ({} floats)", data.len());
            Ok(TileUpload::Created)
        } else if full_rebuild {
            target.update_all(data)?;
            log::debug!("TileMap: full upload ({} floats)", data.len());
            Ok(TileUpload::Full)
        } else {
            let start = first * FLOATS_PER_QUAD;
            let end = (last + 1) * FLOATS_PER_QUAD;
            target.update_range(data, start, end)?;
            log::debug!("TileMap: partial upload floats {start}..{end}");
            Ok(TileUpload::Range { start, end })
        }
    }

    /// Rebuild quads inside `rect`; returns the first and last cell touched.
    fn update_vertices(&mut self, rect: &DirtyRect) -> Option<(usize, usize)> {
        let columns = self.grid.columns();
        let mut touched: Option<(usize, usize)> = None;

        for row in rect.top..rect.bottom {
            for col in rect.left..rect.right {
                let pos = row as usize * columns + col as usize;
                self.quads[pos] = self.build_quad(pos, col, row);
                touched = Some(match touched {
                    None => (pos, pos),
                    Some((first, _)) => (first, pos),
                });
            }
        }
        touched
    }

    fn build_quad(&self, pos: usize, col: i32, row: i32) -> TileQuad {
        let uv = match self.grid.get(pos) {
            Some(index) if index >= 0 => self.atlas.get(index),
            _ => None,
        };
        match uv {
            Some(uv) => {
                let origin = self.cell_origin(col, row);
                TileQuad::new(
                    origin.x,
                    origin.y,
                    origin.x + self.cell_width,
                    origin.y + self.cell_height,
                    &uv,
                )
            }
            // Zero-area quads keep every cell at a fixed buffer slot.
            None => TileQuad::DEGENERATE,
        }
    }

    /// Top-left pixel of the quad at `(col, row)`.
    pub fn cell_origin(&self, col: i32, row: i32) -> Vec2 {
        let x = self.config.column_stride() * col as f32;
        let mut y = self.cell_height * row as f32;
        if self.config.mode.is_hex() && col & 1 == 1 {
            y += 0.5 * self.cell_height;
        }
        Vec2::new(x, y)
    }

    /// UV frame to draw the cell at `(x, y)` as a standalone sprite.
    pub fn cell_frame(&self, x: usize, y: usize) -> Option<UvRect> {
        if x >= self.grid.columns() || y >= self.grid.rows() {
            return None;
        }
        let index = self.grid.get(y * self.grid.columns() + x)?;
        if index < 0 {
            return None;
        }
        self.atlas.get(index)
    }

    /// Release the GPU buffer; the next draw recreates it.
    pub fn destroy<B: GpuBufferTarget>(&mut self, target: &mut B) {
        target.destroy();
        if self.buffer_created {
            self.buffer_created = false;
            self.dirty.mark_all();
        }
    }

    /// Complete vertex storage, 16 floats per cell.
    pub fn vertices(&self) -> &[f32] {
        bytemuck::cast_slice(&self.quads)
    }

    pub fn quad(&self, cell: usize) -> Option<&TileQuad> {
        self.quads.get(cell)
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn atlas(&self) -> &A {
        &self.atlas
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Pixel width of the whole map.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Pixel height of the whole map.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn buffer_created(&self) -> bool {
        self.buffer_created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::gpu_buffer::{MirrorBuffer, UploadRecord};

    fn hex_map() -> TileMap {
        let atlas = TileAtlas::from_grid(72, 64, 18, 16).unwrap();
        TileMap::new(atlas, GridConfig::hex()).unwrap()
    }

    #[test]
    fn test_rejects_mismatched_atlas() {
        let atlas = TileAtlas::from_grid(64, 64, 16, 16).unwrap();
        assert!(matches!(
            TileMap::new(atlas, GridConfig::hex()),
            Err(TileMapError::CellSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_atlas() {
        let atlas = TileAtlas::from_frames(16, 16, Vec::new());
        assert!(matches!(
            TileMap::new(atlas, GridConfig::square()),
            Err(TileMapError::EmptyAtlas)
        ));
    }

    #[test]
    fn test_first_draw_creates_buffer() {
        let mut map = hex_map();
        map.set_grid(vec![0; 16], 4).unwrap();
        let mut buffer = MirrorBuffer::new();

        let draw = map.draw(&mut buffer).unwrap();
        assert_eq!(draw.upload, TileUpload::Created);
        assert_eq!(draw.quad_count, 16);
        assert_eq!(draw.index_count, 96);
        assert_eq!(buffer.uploads(), &[UploadRecord::Create { len: 256 }]);
    }

    #[test]
    fn test_idle_draw_does_not_upload() {
        let mut map = hex_map();
        map.set_grid(vec![0; 16], 4).unwrap();
        let mut buffer = MirrorBuffer::new();
        map.draw(&mut buffer).unwrap();
        buffer.clear_log();

        for _ in 0..3 {
            let draw = map.draw(&mut buffer).unwrap();
            assert_eq!(draw.upload, TileUpload::None);
            assert_eq!(draw.quad_count, 16);
        }
        assert!(buffer.uploads().is_empty());
    }

    #[test]
    fn test_partial_upload_range() {
        let mut map = hex_map();
        map.set_grid(vec![0; 16], 4).unwrap();
        let mut buffer = MirrorBuffer::new();
        map.draw(&mut buffer).unwrap();

        map.set_tile(6, 2).unwrap();
        map.mark_cell_dirty(6);
        let draw = map.draw(&mut buffer).unwrap();
        assert_eq!(draw.upload, TileUpload::Range { start: 96, end: 112 });
    }

    #[test]
    fn test_mark_all_triggers_full_upload() {
        let mut map = hex_map();
        map.set_grid(vec![0; 16], 4).unwrap();
        let mut buffer = MirrorBuffer::new();
        map.draw(&mut buffer).unwrap();

        map.mark_all_dirty();
        assert_eq!(map.draw(&mut buffer).unwrap().upload, TileUpload::Full);
        // Flag is consumed.
        map.mark_cell_dirty(0);
        assert_eq!(
            map.draw(&mut buffer).unwrap().upload,
            TileUpload::Range { start: 0, end: 16 }
        );
    }

    #[test]
    fn test_hex_placement() {
        let map = hex_map();
        assert_eq!(map.cell_origin(0, 0), Vec2::new(0.0, 0.0));
        assert_eq!(map.cell_origin(1, 1), Vec2::new(14.0, 24.0));
        assert_eq!(map.cell_origin(2, 1), Vec2::new(28.0, 16.0));
    }

    #[test]
    fn test_square_placement() {
        let atlas = TileAtlas::from_grid(64, 64, 16, 16).unwrap();
        let map = TileMap::new(atlas, GridConfig::square()).unwrap();
        assert_eq!(map.cell_origin(1, 1), Vec2::new(16.0, 16.0));
        assert_eq!(map.cell_origin(3, 0), Vec2::new(48.0, 0.0));
    }

    #[test]
    fn test_pixel_dimensions() {
        let mut map = hex_map();
        map.set_grid(vec![0; 12], 4).unwrap();
        assert_eq!(map.width(), 14.0 * 3.0 + 18.0);
        assert_eq!(map.height(), 16.0 * 3.0 + 8.0);
    }

    #[test]
    fn test_cell_frame() {
        let mut map = hex_map();
        map.set_grid(vec![0, 1, -1, 99], 2).unwrap();
        assert_eq!(map.cell_frame(1, 0), map.atlas().get(1));
        assert_eq!(map.cell_frame(0, 1), None);
        assert_eq!(map.cell_frame(1, 1), None);
        assert_eq!(map.cell_frame(2, 0), None);
    }

    #[test]
    fn test_regrid_with_new_size_recreates_buffer() {
        let mut map = hex_map();
        let mut buffer = MirrorBuffer::new();
        map.set_grid(vec![0; 4], 2).unwrap();
        map.draw(&mut buffer).unwrap();

        map.set_grid(vec![0; 4], 2).unwrap();
        assert_eq!(map.draw(&mut buffer).unwrap().upload, TileUpload::Full);

        map.set_grid(vec![0; 9], 3).unwrap();
        assert_eq!(map.draw(&mut buffer).unwrap().upload, TileUpload::Created);
        assert_eq!(buffer.data().map(<[f32]>::len), Some(144));
    }

    #[test]
    fn test_failed_upload_requeues_region() {
        struct FailingBuffer;
        impl GpuBufferTarget for FailingBuffer {
            fn create(&mut self, _: &[f32]) -> Result<()> {
                Err(TileMapError::Upload("device lost".into()))
            }
            fn update_all(&mut self, _: &[f32]) -> Result<()> {
                Ok(())
            }
            fn update_range(&mut self, _: &[f32], _: usize, _: usize) -> Result<()> {
                Ok(())
            }
            fn destroy(&mut self) {}
        }

        let mut map = hex_map();
        map.set_grid(vec![0; 4], 2).unwrap();
        assert!(matches!(
            map.draw(&mut FailingBuffer),
            Err(TileMapError::Upload(_))
        ));
        assert!(!map.buffer_created());

        let mut buffer = MirrorBuffer::new();
        assert_eq!(map.draw(&mut buffer).unwrap().upload, TileUpload::Created);
    }
}
