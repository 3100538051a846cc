//! Tile Vertex Layout
//!
//! One tile cell is one quad: four vertices of (position.xy, uv.xy), so 16
//! floats per cell. A cell's quad always lives at float offset `cell * 16`
//! of the vertex storage, which is what lets a contiguous run of cells be
//! re-uploaded on its own.

use bytemuck::{Pod, Zeroable};

use super::atlas::UvRect;

/// Floats per vertex (x, y, u, v).
pub const FLOATS_PER_VERTEX: usize = 4;

/// Vertices per tile quad.
pub const VERTICES_PER_QUAD: usize = 4;

/// Floats per tile quad.
pub const FLOATS_PER_QUAD: usize = FLOATS_PER_VERTEX * VERTICES_PER_QUAD;

/// Indices per tile quad (two triangles).
pub const INDICES_PER_QUAD: usize = 6;

/// GPU vertex for a tile quad corner.
///
/// Layout (16 bytes):
/// - position: vec2<f32> (8 bytes) - pixel-space position
/// - uv:       vec2<f32> (8 bytes) - atlas texture coordinate
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TileVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

/// Four corners in winding order: top-left, top-right, bottom-right, bottom-left.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TileQuad(pub [TileVertex; VERTICES_PER_QUAD]);

static_assertions::assert_eq_size!(TileVertex, [f32; FLOATS_PER_VERTEX]);
static_assertions::assert_eq_size!(TileQuad, [f32; FLOATS_PER_QUAD]);

impl TileQuad {
    /// Zero-area quad at the origin, used for cells that are not drawn.
    pub const DEGENERATE: Self = Self([TileVertex {
        position: [0.0, 0.0],
        uv: [0.0, 0.0],
    }; VERTICES_PER_QUAD]);

    /// Axis-aligned rectangle `[x1, y1]-[x2, y2]` textured with `uv`.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, uv: &UvRect) -> Self {
        Self([
            TileVertex {
                position: [x1, y1],
                uv: [uv.left, uv.top],
            },
            TileVertex {
                position: [x2, y1],
                uv: [uv.right, uv.top],
            },
            TileVertex {
                position: [x2, y2],
                uv: [uv.right, uv.bottom],
            },
            TileVertex {
                position: [x1, y2],
                uv: [uv.left, uv.bottom],
            },
        ])
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.0)
    }
}

/// Index list drawing `quad_count` quads as triangle pairs.
pub fn quad_indices(quad_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(quad_count * INDICES_PER_QUAD);
    for quad in 0..quad_count as u32 {
        let base = quad * VERTICES_PER_QUAD as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    indices
}

/// Vertex buffer layout matching [`TileVertex`].
pub fn tile_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<TileVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position: vec2<f32> at offset 0
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            },
            // uv: vec2<f32> at offset 8
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 8,
                shader_location: 1,
            },
        ],
    }
}
