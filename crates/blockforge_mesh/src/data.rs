//! Mesh output containers and meshing options.

use crate::vertex::PackedVoxelVertex;

/// Number of LOD levels a chunk carries. LOD 0 is authoritative.
pub const LOD_LEVEL_COUNT: usize = 3;

/// Which meshing algorithm to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MeshingMode {
    /// One quad per visible voxel face.
    Naive,
    /// Maximal-rectangle merging with AO-signature preservation.
    #[default]
    Greedy,
}

/// Options for a meshing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshingOptions {
    /// The meshing algorithm.
    pub mode: MeshingMode,
}

impl MeshingOptions {
    /// Options for the naive mesher.
    pub const NAIVE: Self = Self {
        mode: MeshingMode::Naive,
    };

    /// Options for the greedy mesher.
    pub const GREEDY: Self = Self {
        mode: MeshingMode::Greedy,
    };
}

/// One mesh: packed vertices plus 32-bit triangle indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkMeshData {
    /// Packed vertices.
    pub vertices: Vec<PackedVoxelVertex>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<u32>,
}

impl ChunkMeshData {
    /// Returns true if the mesh holds no geometry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Appends one quad's four packed vertices and six indices.
    pub(crate) fn push_quad(&mut self, corners: [PackedVoxelVertex; 4]) {
        #[allow(clippy::cast_possible_truncation)]
        let base_vertex = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices.extend_from_slice(&[
            base_vertex,
            base_vertex + 1,
            base_vertex + 2,
            base_vertex,
            base_vertex + 2,
            base_vertex + 3,
        ]);
    }
}

/// Per-chunk meshes for up to [`LOD_LEVEL_COUNT`] LOD levels.
///
/// Higher levels may be empty; consumers fall back to LOD 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkLodMeshes {
    /// Meshes indexed by LOD level.
    pub lod_meshes: [ChunkMeshData; LOD_LEVEL_COUNT],
}

impl ChunkLodMeshes {
    /// Returns the authoritative LOD 0 mesh.
    #[inline]
    #[must_use]
    pub fn base_mesh(&self) -> &ChunkMeshData {
        &self.lod_meshes[0]
    }
}
