//! GPU Vertex Buffer Target
//!
//! The upload contract the tile renderer drives, and its wgpu
//! implementation. Offsets are in floats, matching the fixed per-cell quad
//! addressing of the vertex storage.

use wgpu::util::DeviceExt;

use super::tile_vertex::{FLOATS_PER_QUAD, quad_indices};
use crate::error::{Result, TileMapError};

/// Receiver of tile vertex data.
pub trait GpuBufferTarget {
    /// Create the buffer from the complete vertex storage.
    fn create(&mut self, data: &[f32]) -> Result<()>;

    /// Re-upload the complete vertex storage.
    fn update_all(&mut self, data: &[f32]) -> Result<()>;

    /// Re-upload `data[start..end]` to the same float offsets.
    fn update_range(&mut self, data: &[f32], start: usize, end: usize) -> Result<()>;

    /// Release the buffer. Later uploads require a new `create`.
    fn destroy(&mut self);
}

/// One upload seen by a [`MirrorBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadRecord {
    Create { len: usize },
    All { len: usize },
    Range { start: usize, end: usize },
    Destroy,
}

/// CPU-side buffer target that keeps a copy of everything uploaded.
///
/// Useful for headless runs and for checking which ranges a frame sent.
#[derive(Clone, Debug, Default)]
pub struct MirrorBuffer {
    data: Option<Vec<f32>>,
    uploads: Vec<UploadRecord>,
}

impl MirrorBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploaded contents, `None` before `create` or after `destroy`.
    pub fn data(&self) -> Option<&[f32]> {
        self.data.as_deref()
    }

    pub fn uploads(&self) -> &[UploadRecord] {
        &self.uploads
    }

    pub fn last_upload(&self) -> Option<UploadRecord> {
        self.uploads.last().copied()
    }

    pub fn clear_log(&mut self) {
        self.uploads.clear();
    }

    fn stored_mut(&mut self, len: usize) -> Result<&mut Vec<f32>> {
        let stored = self
            .data
            .as_mut()
            .ok_or_else(|| TileMapError::Upload("vertex buffer not created".into()))?;
        if stored.len() != len {
            return Err(TileMapError::UploadOutOfRange {
                start: 0,
                end: len,
                len: stored.len(),
            });
        }
        Ok(stored)
    }
}

impl GpuBufferTarget for MirrorBuffer {
    fn create(&mut self, data: &[f32]) -> Result<()> {
        self.data = Some(data.to_vec());
        self.uploads.push(UploadRecord::Create { len: data.len() });
        Ok(())
    }

    fn update_all(&mut self, data: &[f32]) -> Result<()> {
        self.stored_mut(data.len())?.copy_from_slice(data);
        self.uploads.push(UploadRecord::All { len: data.len() });
        Ok(())
    }

    fn update_range(&mut self, data: &[f32], start: usize, end: usize) -> Result<()> {
        if start > end || end > data.len() {
            return Err(TileMapError::UploadOutOfRange {
                start,
                end,
                len: data.len(),
            });
        }
        self.stored_mut(data.len())?[start..end].copy_from_slice(&data[start..end]);
        self.uploads.push(UploadRecord::Range { start, end });
        Ok(())
    }

    fn destroy(&mut self) {
        self.data = None;
        self.uploads.push(UploadRecord::Destroy);
    }
}

/// wgpu vertex buffer plus the matching quad index buffer.
pub struct WgpuTileBuffer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    /// Capacity of the vertex buffer in floats
    len: usize,
}

impl WgpuTileBuffer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            vertex_buffer: None,
            index_buffer: None,
            len: 0,
        }
    }

    pub fn vertex_buffer(&self) -> Option<&wgpu::Buffer> {
        self.vertex_buffer.as_ref()
    }

    pub fn index_buffer(&self) -> Option<&wgpu::Buffer> {
        self.index_buffer.as_ref()
    }

    /// Number of quads the buffer holds.
    pub fn quad_capacity(&self) -> usize {
        self.len / FLOATS_PER_QUAD
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if self.vertex_buffer.is_none() {
            return Err(TileMapError::Upload("vertex buffer not created".into()));
        }
        if len != self.len {
            return Err(TileMapError::UploadOutOfRange {
                start: 0,
                end: len,
                len: self.len,
            });
        }
        Ok(())
    }
}

impl GpuBufferTarget for WgpuTileBuffer {
    fn create(&mut self, data: &[f32]) -> Result<()> {
        if data.is_empty() {
            return Err(TileMapError::Upload("cannot create an empty vertex buffer".into()));
        }

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Tile Map Vertex Buffer"),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

        let indices = quad_indices(data.len() / FLOATS_PER_QUAD);
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Tile Map Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
        self.len = data.len();
        Ok(())
    }

    fn update_all(&mut self, data: &[f32]) -> Result<()> {
        self.check_len(data.len())?;
        if let Some(buffer) = &self.vertex_buffer {
            self.queue.write_buffer(buffer, 0, bytemuck::cast_slice(data));
        }
        Ok(())
    }

    fn update_range(&mut self, data: &[f32], start: usize, end: usize) -> Result<()> {
        self.check_len(data.len())?;
        if start > end || end > data.len() {
            return Err(TileMapError::UploadOutOfRange {
                start,
                end,
                len: data.len(),
            });
        }
        if let Some(buffer) = &self.vertex_buffer {
            let offset = (start * std::mem::size_of::<f32>()) as wgpu::BufferAddress;
            self.queue
                .write_buffer(buffer, offset, bytemuck::cast_slice(&data[start..end]));
        }
        Ok(())
    }

    fn destroy(&mut self) {
        if let Some(buffer) = self.vertex_buffer.take() {
            buffer.destroy();
        }
        if let Some(buffer) = self.index_buffer.take() {
            buffer.destroy();
        }
        self.len = 0;
    }
}

impl Drop for WgpuTileBuffer {
    fn drop(&mut self) {
        self.destroy();
    }
}
