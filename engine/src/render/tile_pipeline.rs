//! Tile Map GPU Pipeline
//!
//! Uploads the tile atlas as a texture and records the indexed quad draw
//! for a [`TileDraw`] produced by the tile map. The atlas is sampled with
//! nearest filtering and clamp-to-edge addressing so hex edges stay crisp.
//!
//! GPU resources are created on construction and released on drop.

use glam::Mat4;
use image::RgbaImage;

use super::gpu_buffer::WgpuTileBuffer;
use super::tile_map::TileDraw;
use super::tile_vertex::tile_vertex_layout;
use crate::world::TileTint;

/// Embedded tile map shader source.
pub const TILE_MAP_SHADER: &str = include_str!("../../../shaders/tile_map.wgsl");

// ============================================================================
// UNIFORMS
// ============================================================================

/// Uniform buffer layout for the tile map shader (16-byte aligned).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TileMapUniforms {
    view_projection: [[f32; 4]; 4], // 64 bytes
    tint_multiply: [f32; 4],        // 16 bytes
    tint_add: [f32; 4],             // 16 bytes - total 96 bytes
}

static_assertions::assert_eq_size!(TileMapUniforms, [u8; 96]);

impl TileMapUniforms {
    pub fn new(view_projection: Mat4, tint: &TileTint) -> Self {
        Self {
            view_projection: view_projection.to_cols_array_2d(),
            tint_multiply: tint.multiply,
            tint_add: tint.add,
        }
    }

    /// Pixel-space camera: `(0, 0)` top-left, y down, `width x height` visible
    /// starting at `scroll`.
    pub fn pixel_camera(width: f32, height: f32, scroll: glam::Vec2, tint: &TileTint) -> Self {
        let projection = Mat4::orthographic_rh(
            scroll.x,
            scroll.x + width,
            scroll.y + height,
            scroll.y,
            -1.0,
            1.0,
        );
        Self::new(projection, tint)
    }
}

// ============================================================================
// ATLAS TEXTURE
// ============================================================================

/// Atlas image uploaded as a sampled GPU texture.
pub struct AtlasTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl AtlasTexture {
    /// Upload an RGBA atlas. The image may be dropped afterwards.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        label: &str,
    ) -> Self {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Tile Atlas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        log::debug!("AtlasTexture: uploaded {label} ({width}x{height})");

        Self {
            _texture: texture,
            view,
            sampler,
            width,
            height,
        }
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Render pipeline, uniforms and atlas binding for one tile map.
pub struct TileMapPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
}

impl TileMapPipeline {
    pub fn new(
        device: &wgpu::Device,
        atlas: &AtlasTexture,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Tile Map Uniform Buffer"),
            size: std::mem::size_of::<TileMapUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Tile Map Bind Group Layout"),
            entries: &[
                // @binding(0): uniform buffer
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // @binding(1): atlas texture
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // @binding(2): atlas sampler
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Tile Map Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&atlas.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Tile Map Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Tile Map Shader"),
            source: wgpu::ShaderSource::Wgsl(TILE_MAP_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Tile Map Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[tile_vertex_layout()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
        }
    }

    /// Write camera and tint for the next draw.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &TileMapUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Record the tile quads into an open render pass.
    ///
    /// Does nothing until the vertex buffer exists.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, buffer: &WgpuTileBuffer, draw: &TileDraw) {
        let (Some(vertices), Some(indices)) = (buffer.vertex_buffer(), buffer.index_buffer())
        else {
            return;
        };
        if draw.index_count == 0 {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, vertices.slice(..));
        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..draw.index_count, 0, 0..1);
    }
}
