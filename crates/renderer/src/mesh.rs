//! GPU-side mesh: packed vertex type plus the vertex/index buffer
//! composition bound for indexed draws.

use asset::{MeshData, MeshVertex};
use bytemuck::{Pod, Zeroable};
use wgpu::{Device, RenderPass};

use crate::buffer::{IndexBuffer, VertexBuffer};
use crate::layout::{AttributeKind, VertexLayout};

/// Packed vertex as the shaders consume it: position, uv, normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Attribute layout matching the field order. The layout stride must
    /// equal `size_of::<Vertex>()` for the buffer bytes to be interpreted
    /// correctly.
    pub fn layout() -> VertexLayout {
        let mut layout = VertexLayout::new();
        layout
            .push(AttributeKind::Float32, 3)
            .push(AttributeKind::Float32, 2)
            .push(AttributeKind::Float32, 3);
        layout
    }
}

impl From<MeshVertex> for Vertex {
    fn from(v: MeshVertex) -> Self {
        Self {
            position: v.position,
            uv: v.uv,
            normal: v.normal,
        }
    }
}

/// Vertex + index buffers for one mesh. The demo uploads the whole mesh once
/// and never streams geometry.
pub struct GpuMesh {
    vertex_buf: VertexBuffer,
    index_buf: IndexBuffer,
}

impl GpuMesh {
    pub fn upload(device: &Device, data: &MeshData) -> Self {
        let vertices: Vec<Vertex> = data.vertices.iter().copied().map(Vertex::from).collect();
        let vertex_buf = VertexBuffer::new(device, bytemuck::cast_slice(&vertices));
        let index_buf = IndexBuffer::new(device, &data.indices);
        Self {
            vertex_buf,
            index_buf,
        }
    }

    /// Bind both buffers on the pass, rebinding from scratch every call.
    pub fn bind(&self, rpass: &mut RenderPass<'_>) {
        self.vertex_buf.bind(rpass);
        self.index_buf.bind(rpass);
    }

    pub fn index_count(&self) -> u32 {
        self.index_buf.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_stride_matches_vertex_size() {
        assert_eq!(
            Vertex::layout().stride(),
            std::mem::size_of::<Vertex>() as u64
        );
    }

    #[test]
    fn layout_offsets_match_fields() {
        let layout = Vertex::layout();
        let offsets: Vec<u64> = layout.attributes().iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 20]);
    }

    #[test]
    fn mesh_vertex_converts_field_for_field() {
        let src = MeshVertex::new([1.0, 2.0, 3.0], [0.5, 0.25], [0.0, 1.0, 0.0]);
        let gpu = Vertex::from(src);
        assert_eq!(gpu.position, [1.0, 2.0, 3.0]);
        assert_eq!(gpu.uv, [0.5, 0.25]);
        assert_eq!(gpu.normal, [0.0, 1.0, 0.0]);
    }
}
