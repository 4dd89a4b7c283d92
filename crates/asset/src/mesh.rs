//! CPU-side mesh representation used by loaders.

/// Vertex as produced by the OBJ loader. Field order is the GPU attribute
/// order: position, texture coordinate, normal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], uv: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }
}

/// Indexed triangle mesh. The loader performs no welding, so the index list
/// is the identity sequence over the vertex list: one entry per face corner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Built-in unit cube so the viewer runs without a model on disk.
    /// Unwelded like loader output: 36 vertices, identity indices,
    /// per-face normals.
    pub fn demo_cube() -> Self {
        const FACES: [([[f32; 3]; 4], [f32; 3]); 6] = [
            // +Z
            (
                [
                    [-1.0, -1.0, 1.0],
                    [1.0, -1.0, 1.0],
                    [1.0, 1.0, 1.0],
                    [-1.0, 1.0, 1.0],
                ],
                [0.0, 0.0, 1.0],
            ),
            // -Z
            (
                [
                    [1.0, -1.0, -1.0],
                    [-1.0, -1.0, -1.0],
                    [-1.0, 1.0, -1.0],
                    [1.0, 1.0, -1.0],
                ],
                [0.0, 0.0, -1.0],
            ),
            // +X
            (
                [
                    [1.0, -1.0, 1.0],
                    [1.0, -1.0, -1.0],
                    [1.0, 1.0, -1.0],
                    [1.0, 1.0, 1.0],
                ],
                [1.0, 0.0, 0.0],
            ),
            // -X
            (
                [
                    [-1.0, -1.0, -1.0],
                    [-1.0, -1.0, 1.0],
                    [-1.0, 1.0, 1.0],
                    [-1.0, 1.0, -1.0],
                ],
                [-1.0, 0.0, 0.0],
            ),
            // +Y
            (
                [
                    [-1.0, 1.0, 1.0],
                    [1.0, 1.0, 1.0],
                    [1.0, 1.0, -1.0],
                    [-1.0, 1.0, -1.0],
                ],
                [0.0, 1.0, 0.0],
            ),
            // -Y
            (
                [
                    [-1.0, -1.0, -1.0],
                    [1.0, -1.0, -1.0],
                    [1.0, -1.0, 1.0],
                    [-1.0, -1.0, 1.0],
                ],
                [0.0, -1.0, 0.0],
            ),
        ];
        const UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

        let mut vertices = Vec::with_capacity(36);
        let mut indices = Vec::with_capacity(36);
        for (corners, normal) in FACES {
            for tri in [[0usize, 1, 2], [0, 2, 3]] {
                for corner in tri {
                    indices.push(vertices.len() as u32);
                    vertices.push(MeshVertex::new(corners[corner], UVS[corner], normal));
                }
            }
        }
        Self { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_count_counts_faces() {
        let data = MeshData::new(vec![MeshVertex::default(); 3], vec![0, 1, 2]);
        assert_eq!(data.triangle_count(), 1);
        assert!(!data.is_empty());
    }

    #[test]
    fn demo_cube_is_unwelded() {
        let cube = MeshData::demo_cube();
        assert_eq!(cube.vertices.len(), 36);
        assert_eq!(cube.triangle_count(), 12);
        let identity: Vec<u32> = (0..36).collect();
        assert_eq!(cube.indices, identity);
    }
}
