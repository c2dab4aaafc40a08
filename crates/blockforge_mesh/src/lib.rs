//! # Blockforge Mesh
//!
//! Turns 16^3 voxel chunks into GPU-ready triangle meshes.
//!
//! Two meshing modes share one set of face/corner/AO tables:
//!
//! - **Naive**: one quad per visible voxel face. The reference surface.
//! - **Greedy**: merges coplanar faces with equal material AND equal
//!   per-corner ambient-occlusion signature into maximal rectangles, so
//!   merged lighting is indistinguishable from the naive output.
//!
//! Both modes are pure functions of the chunk and produce byte-identical
//! buffers across runs.

pub mod data;
mod faces;
mod greedy;
mod naive;
pub mod preview;
pub mod vertex;

pub use data::{ChunkLodMeshes, ChunkMeshData, MeshingMode, MeshingOptions, LOD_LEVEL_COUNT};
pub use preview::build_single_voxel_preview_mesh;
pub use vertex::PackedVoxelVertex;

use blockforge_world::{Chunk, ChunkGrid};

/// Builds the per-LOD meshes of a chunk in the requested mode.
///
/// LOD 0 is the authoritative surface; higher levels are currently left
/// empty and flow through the merge path untouched.
#[must_use]
pub fn build_chunk_lod_meshes(chunk: &Chunk, options: MeshingOptions) -> ChunkLodMeshes {
    match options.mode {
        MeshingMode::Naive => naive::build_chunk_lod_meshes_naive(chunk),
        MeshingMode::Greedy => greedy::build_chunk_lod_meshes_greedy(chunk),
    }
}

/// Builds a single merged mesh holding every LOD level of a chunk, with
/// indices rebased into the combined vertex buffer.
#[must_use]
pub fn build_chunk_mesh(chunk: &Chunk, options: MeshingOptions) -> ChunkMeshData {
    let lod_meshes = build_chunk_lod_meshes(chunk, options);

    let vertex_total: usize = lod_meshes.lod_meshes.iter().map(|m| m.vertices.len()).sum();
    let index_total: usize = lod_meshes.lod_meshes.iter().map(|m| m.indices.len()).sum();

    let mut merged = ChunkMeshData::default();
    merged.vertices.reserve(vertex_total);
    merged.indices.reserve(index_total);

    for mesh in &lod_meshes.lod_meshes {
        #[allow(clippy::cast_possible_truncation)]
        let base_vertex = merged.vertices.len() as u32;
        merged.vertices.extend_from_slice(&mesh.vertices);
        merged.indices.extend(mesh.indices.iter().map(|i| base_vertex + i));
    }

    merged
}

/// Meshes the first chunk of a grid; empty grids yield an empty mesh.
#[must_use]
pub fn build_single_chunk_mesh(grid: &ChunkGrid, options: MeshingOptions) -> ChunkMeshData {
    match grid.chunks().first() {
        Some(chunk) => build_chunk_mesh(chunk, options),
        None => ChunkMeshData::default(),
    }
}
