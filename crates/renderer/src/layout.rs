//! Vertex attribute layout description.

use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// Scalar component type of a vertex attribute. All kinds are 4 bytes per
/// component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeKind {
    Float32,
    Uint32,
    Sint32,
}

impl AttributeKind {
    fn format(self, count: u32) -> VertexFormat {
        match (self, count) {
            (AttributeKind::Float32, 1) => VertexFormat::Float32,
            (AttributeKind::Float32, 2) => VertexFormat::Float32x2,
            (AttributeKind::Float32, 3) => VertexFormat::Float32x3,
            (AttributeKind::Float32, 4) => VertexFormat::Float32x4,
            (AttributeKind::Uint32, 1) => VertexFormat::Uint32,
            (AttributeKind::Uint32, 2) => VertexFormat::Uint32x2,
            (AttributeKind::Uint32, 3) => VertexFormat::Uint32x3,
            (AttributeKind::Uint32, 4) => VertexFormat::Uint32x4,
            (AttributeKind::Sint32, 1) => VertexFormat::Sint32,
            (AttributeKind::Sint32, 2) => VertexFormat::Sint32x2,
            (AttributeKind::Sint32, 3) => VertexFormat::Sint32x3,
            (AttributeKind::Sint32, 4) => VertexFormat::Sint32x4,
            _ => panic!("unsupported component count {count}"),
        }
    }
}

/// Ordered attribute descriptions plus the accumulated stride.
///
/// Nothing here checks that pushed attributes agree with the bytes in the
/// bound buffer; that agreement is the caller's invariant.
#[derive(Clone, Debug, Default)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: BufferAddress,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one attribute of `count` components at the next shader
    /// location; its byte offset is the stride accumulated so far.
    pub fn push(&mut self, kind: AttributeKind, count: u32) -> &mut Self {
        self.attributes.push(VertexAttribute {
            format: kind.format(count),
            offset: self.stride,
            shader_location: self.attributes.len() as u32,
        });
        self.stride += BufferAddress::from(count) * 4;
        self
    }

    pub fn stride(&self) -> BufferAddress {
        self.stride
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Borrowed wgpu layout for pipeline creation.
    pub fn buffer_layout(&self) -> VertexBufferLayout<'_> {
        VertexBufferLayout {
            array_stride: self.stride,
            step_mode: VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_accumulates_stride_and_offsets() {
        let mut layout = VertexLayout::new();
        layout
            .push(AttributeKind::Float32, 3)
            .push(AttributeKind::Float32, 2)
            .push(AttributeKind::Float32, 3);

        assert_eq!(layout.stride(), 32);
        let attrs = layout.attributes();
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[0].offset, 0);
        assert_eq!(attrs[1].offset, 12);
        assert_eq!(attrs[2].offset, 20);
        assert_eq!(attrs[0].shader_location, 0);
        assert_eq!(attrs[1].shader_location, 1);
        assert_eq!(attrs[2].shader_location, 2);
        assert_eq!(attrs[1].format, VertexFormat::Float32x2);
    }

    #[test]
    fn buffer_layout_round_trips_declaration() {
        let mut layout = VertexLayout::new();
        layout
            .push(AttributeKind::Float32, 3)
            .push(AttributeKind::Uint32, 4);

        let wgpu_layout = layout.buffer_layout();
        assert_eq!(wgpu_layout.array_stride, layout.stride());
        assert_eq!(wgpu_layout.step_mode, VertexStepMode::Vertex);
        assert_eq!(wgpu_layout.attributes, layout.attributes());
        assert_eq!(wgpu_layout.attributes[1].format, VertexFormat::Uint32x4);
        assert_eq!(wgpu_layout.attributes[1].offset, 12);
    }
}
