//! The naive mesher: one quad per visible voxel face.
//!
//! This is the reference surface the greedy mode must cover exactly; it
//! is also the fallback path when a merged quad cannot be encoded.

use blockforge_world::{Chunk, CHUNK_SIZE};

use crate::data::{ChunkLodMeshes, ChunkMeshData};
use crate::faces::{corner_ao_level, face_normal};
use crate::vertex::PackedVoxelVertex;

/// Appends the quad of one voxel face, with per-corner AO.
#[allow(clippy::cast_sign_loss)]
pub(crate) fn append_voxel_face(
    chunk: &Chunk,
    mesh: &mut ChunkMeshData,
    x: i32,
    y: i32,
    z: i32,
    face: usize,
    material: u32,
    lod_level: u32,
) {
    let mut corners = [PackedVoxelVertex::default(); 4];
    for (corner, vertex) in corners.iter_mut().enumerate() {
        let ao = corner_ao_level(chunk, x, y, z, face, corner);
        *vertex = PackedVoxelVertex::pack(
            x as u32,
            y as u32,
            z as u32,
            face as u32,
            corner as u32,
            ao,
            material,
            lod_level,
        );
    }
    mesh.push_quad(corners);
}

/// Builds LOD meshes in naive mode.
///
/// Sweeps voxels in Y, then Z, then X order and emits a face wherever
/// the outward neighbour is empty (chunk borders read empty).
pub(crate) fn build_chunk_lod_meshes_naive(chunk: &Chunk) -> ChunkLodMeshes {
    let mut meshes = ChunkLodMeshes::default();
    let base_mesh = &mut meshes.lod_meshes[0];

    for y in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let voxel = chunk.voxel_at(x, y, z);
                if voxel.is_empty() {
                    continue;
                }

                let material = u32::from(voxel.kind.material());
                for face in 0..6 {
                    let normal = face_normal(face);
                    if chunk.is_solid(x + normal.x, y + normal.y, z + normal.z) {
                        continue;
                    }
                    append_voxel_face(chunk, base_mesh, x, y, z, face, material, 0);
                }
            }
        }
    }

    meshes
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockforge_world::{Voxel, VoxelKind};

    #[test]
    fn test_empty_chunk_yields_empty_mesh() {
        let chunk = Chunk::new(0, 0, 0);
        let meshes = build_chunk_lod_meshes_naive(&chunk);
        assert!(meshes.base_mesh().is_empty());
    }

    #[test]
    fn test_single_voxel_emits_six_faces() {
        let mut chunk = Chunk::new(0, 0, 0);
        chunk.set_voxel(5, 5, 5, Voxel::new(VoxelKind::Stone));

        let meshes = build_chunk_lod_meshes_naive(&chunk);
        assert_eq!(meshes.base_mesh().vertices.len(), 24);
        assert_eq!(meshes.base_mesh().indices.len(), 36);
    }

    #[test]
    fn test_buried_faces_are_culled() {
        let mut chunk = Chunk::new(0, 0, 0);
        for offset in 0..2 {
            chunk.set_voxel(5 + offset, 5, 5, Voxel::new(VoxelKind::Stone));
        }

        // Two touching voxels share one hidden face pair: 10 faces.
        let meshes = build_chunk_lod_meshes_naive(&chunk);
        assert_eq!(meshes.base_mesh().vertices.len(), 10 * 4);
        assert_eq!(meshes.base_mesh().indices.len(), 10 * 6);
    }

    #[test]
    fn test_vertex_fields_round_trip() {
        let mut chunk = Chunk::new(0, 0, 0);
        chunk.set_voxel(3, 1, 2, Voxel::new(VoxelKind::SolidRed));

        let meshes = build_chunk_lod_meshes_naive(&chunk);
        let first = meshes.base_mesh().vertices[0];
        assert_eq!(first.x(), 3);
        assert_eq!(first.y(), 1);
        assert_eq!(first.z(), 2);
        assert_eq!(first.material(), 251);
        assert_eq!(first.lod(), 0);
    }
}
