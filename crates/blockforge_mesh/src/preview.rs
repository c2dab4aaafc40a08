//! Placement-cursor preview mesh.

use crate::data::ChunkMeshData;
use crate::vertex::PackedVoxelVertex;

/// Builds the 24-vertex / 36-index unit-cube mesh used for placement
/// cursors.
///
/// Face, corner, and index orderings match the main mesher so the
/// preview lights and winds exactly like the block it previews. All
/// four corners of every face carry the supplied `ao` level.
#[must_use]
pub fn build_single_voxel_preview_mesh(
    x: u32,
    y: u32,
    z: u32,
    ao: u32,
    material: u32,
) -> ChunkMeshData {
    let mut mesh = ChunkMeshData::default();
    mesh.vertices.reserve(24);
    mesh.indices.reserve(36);

    for face in 0..6u32 {
        let mut corners = [PackedVoxelVertex::default(); 4];
        for (corner, vertex) in corners.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            {
                *vertex = PackedVoxelVertex::pack(x, y, z, face, corner as u32, ao, material, 0);
            }
        }
        mesh.push_quad(corners);
    }

    mesh
}
