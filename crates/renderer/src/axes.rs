//! World-axes gizmo: three colored lines through the origin, drawn in world
//! space independent of the model transform.

use bytemuck::{Pod, Zeroable};

use crate::layout::{AttributeKind, VertexLayout};

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct AxisVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl AxisVertex {
    pub fn layout() -> VertexLayout {
        let mut layout = VertexLayout::new();
        layout
            .push(AttributeKind::Float32, 3)
            .push(AttributeKind::Float32, 3);
        layout
    }
}

pub const AXIS_EXTENT: f32 = 150.0;

/// X red, Y green, Z blue.
pub const AXIS_VERTICES: [AxisVertex; 6] = [
    AxisVertex {
        position: [0.0, 0.0, 0.0],
        color: [1.0, 0.0, 0.0],
    },
    AxisVertex {
        position: [AXIS_EXTENT, 0.0, 0.0],
        color: [1.0, 0.0, 0.0],
    },
    AxisVertex {
        position: [0.0, 0.0, 0.0],
        color: [0.0, 1.0, 0.0],
    },
    AxisVertex {
        position: [0.0, AXIS_EXTENT, 0.0],
        color: [0.0, 1.0, 0.0],
    },
    AxisVertex {
        position: [0.0, 0.0, 0.0],
        color: [0.0, 0.0, 1.0],
    },
    AxisVertex {
        position: [0.0, 0.0, AXIS_EXTENT],
        color: [0.0, 0.0, 1.0],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_layout_matches_vertex_size() {
        assert_eq!(
            AxisVertex::layout().stride(),
            std::mem::size_of::<AxisVertex>() as u64
        );
    }
}
