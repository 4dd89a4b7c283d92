//! GPU buffer handles. Each handle exclusively owns its buffer object; the
//! allocation is released exactly once when the handle drops.

use wgpu::{Buffer, BufferAddress, BufferUsages, Device, IndexFormat, RenderPass, util::DeviceExt};

/// Vertex data, uploaded once at construction.
pub struct VertexBuffer {
    raw: Buffer,
    size: BufferAddress,
}

impl VertexBuffer {
    pub fn new(device: &Device, contents: &[u8]) -> Self {
        let raw = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents,
            usage: BufferUsages::VERTEX,
        });
        Self {
            raw,
            size: contents.len() as BufferAddress,
        }
    }

    /// Make this buffer the active vertex source for slot 0.
    pub fn bind(&self, rpass: &mut RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.raw.slice(..));
    }

    pub fn size(&self) -> BufferAddress {
        self.size
    }
}

/// u32 index data, uploaded once at construction.
pub struct IndexBuffer {
    raw: Buffer,
    count: u32,
}

impl IndexBuffer {
    pub fn new(device: &Device, indices: &[u32]) -> Self {
        let raw = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: BufferUsages::INDEX,
        });
        Self {
            raw,
            count: indices.len() as u32,
        }
    }

    /// Make this buffer the active index source.
    pub fn bind(&self, rpass: &mut RenderPass<'_>) {
        rpass.set_index_buffer(self.raw.slice(..), IndexFormat::Uint32);
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
