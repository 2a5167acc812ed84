//! CPU-side mesh representations: raw loader output and renderer-ready data.

/// One polygon of a [`RawMesh`]. Indices are 0-based.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Face {
    pub vertices: Vec<u32>,
    /// Per-corner indices into [`RawMesh::normals`], parallel to `vertices`.
    pub normals: Option<Vec<u32>>,
}

impl Face {
    pub fn new(vertices: Vec<u32>) -> Self {
        Self {
            vertices,
            normals: None,
        }
    }

    pub fn with_normals(vertices: Vec<u32>, normals: Vec<u32>) -> Self {
        Self {
            vertices,
            normals: Some(normals),
        }
    }
}

/// Geometry as read from a file, before centering, scaling and normal
/// resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMesh {
    pub positions: Vec<[f32; 3]>,
    pub faces: Vec<Face>,
    pub normals: Vec<[f32; 3]>,
}

impl RawMesh {
    pub fn new(positions: Vec<[f32; 3]>, faces: Vec<Face>) -> Self {
        Self {
            positions,
            faces,
            normals: Vec::new(),
        }
    }
}

/// Vertex with position/normal. Values are in normalized object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Indexed triangle mesh with one normal per vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
    /// Indices of source faces whose normal could not be computed.
    pub degenerate_faces: Vec<usize>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            degenerate_faces: Vec::new(),
        }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Positions as `x, y, z` triples.
    pub fn positions_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.position).collect()
    }

    /// Normals as `x, y, z` triples, same order as [`Self::positions_flat`].
    pub fn normals_flat(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.normal).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![MeshVertex::default()], vec![0]);
        assert!(data.is_valid());
        assert!(!MeshData::default().is_valid());
    }

    #[test]
    fn flat_buffers_have_three_floats_per_vertex() {
        let data = MeshData::new(
            vec![
                MeshVertex::new([1.0, 2.0, 3.0], [0.0, 0.0, 1.0]),
                MeshVertex::new([4.0, 5.0, 6.0], [0.0, 1.0, 0.0]),
            ],
            vec![0, 1, 1],
        );
        assert_eq!(data.positions_flat(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(data.normals_flat(), vec![0.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        assert_eq!(data.triangle_count(), 1);
    }
}
