//! The greedy mesher: maximal-rectangle merging with AO preservation.
//!
//! For each face direction the chunk is swept slice by slice. Each slice
//! builds a 2D mask keyed on `(material << 8) | ao_signature`; only
//! faces that agree on BOTH merge, so greedy output lights identically
//! to naive output. Rectangles grow along u first, then along v while
//! every cell of the candidate row still matches.

use blockforge_world::{Chunk, CHUNK_SIZE};

use crate::data::{ChunkLodMeshes, ChunkMeshData};
use crate::faces::{
    face_corner_ao_signature, face_normal, make_mask_key, rect_corner_grid, slice_cell_to_voxel,
    EMPTY_MASK_KEY, FACE_CORNER_OFFSETS,
};
use crate::naive::append_voxel_face;
use crate::vertex::PackedVoxelVertex;

#[inline]
#[allow(clippy::cast_sign_loss)]
fn mask_index(u: i32, v: i32) -> usize {
    (u + v * CHUNK_SIZE) as usize
}

/// Appends one merged rectangle as a quad.
///
/// Returns false without touching the mesh when any corner's base voxel
/// would fall outside the chunk - the 5-bit position fields cannot
/// encode it, and the caller downgrades to per-voxel emission instead of
/// dropping geometry.
#[allow(clippy::too_many_arguments)]
#[allow(clippy::cast_sign_loss)]
fn append_greedy_face_quad(
    mesh: &mut ChunkMeshData,
    face: usize,
    slice: i32,
    u: i32,
    v: i32,
    width: i32,
    height: i32,
    material: u8,
    ao_signature: u8,
    lod_level: u32,
) -> bool {
    let mut corners = [PackedVoxelVertex::default(); 4];
    for (corner, vertex) in corners.iter_mut().enumerate() {
        let grid = rect_corner_grid(face, slice, u, v, width, height, corner);
        let offset = FACE_CORNER_OFFSETS[face][corner];
        let base = grid - offset;
        if base.x < 0
            || base.x >= CHUNK_SIZE
            || base.y < 0
            || base.y >= CHUNK_SIZE
            || base.z < 0
            || base.z >= CHUNK_SIZE
        {
            return false;
        }

        let ao = u32::from((ao_signature >> (corner * 2)) & 0x3);
        *vertex = PackedVoxelVertex::pack(
            base.x as u32,
            base.y as u32,
            base.z as u32,
            face as u32,
            corner as u32,
            ao,
            u32::from(material),
            lod_level,
        );
    }

    mesh.push_quad(corners);
    true
}

/// Builds LOD meshes in greedy mode.
pub(crate) fn build_chunk_lod_meshes_greedy(chunk: &Chunk) -> ChunkLodMeshes {
    let mut meshes = ChunkLodMeshes::default();
    let base_mesh = &mut meshes.lod_meshes[0];

    let mut mask = vec![EMPTY_MASK_KEY; (CHUNK_SIZE * CHUNK_SIZE) as usize];

    for face in 0..6 {
        let normal = face_normal(face);

        for slice in 0..CHUNK_SIZE {
            mask.fill(EMPTY_MASK_KEY);

            // Mask pass: visible faces keyed by material + AO signature.
            for v in 0..CHUNK_SIZE {
                for u in 0..CHUNK_SIZE {
                    let pos = slice_cell_to_voxel(face, slice, u, v);
                    let voxel = chunk.voxel_at(pos.x, pos.y, pos.z);
                    if voxel.is_empty() {
                        continue;
                    }
                    if chunk.is_solid(pos.x + normal.x, pos.y + normal.y, pos.z + normal.z) {
                        continue;
                    }

                    let material = voxel.kind.material();
                    let ao_signature = face_corner_ao_signature(chunk, pos.x, pos.y, pos.z, face);
                    mask[mask_index(u, v)] = make_mask_key(material, ao_signature);
                }
            }

            // Extraction pass: grow maximal rectangles in (u, v) order.
            for v in 0..CHUNK_SIZE {
                let mut u = 0;
                while u < CHUNK_SIZE {
                    let key = mask[mask_index(u, v)];
                    if key == EMPTY_MASK_KEY {
                        u += 1;
                        continue;
                    }

                    let mut width = 1;
                    while u + width < CHUNK_SIZE && mask[mask_index(u + width, v)] == key {
                        width += 1;
                    }

                    let mut height = 1;
                    'grow: while v + height < CHUNK_SIZE {
                        for offset_u in 0..width {
                            if mask[mask_index(u + offset_u, v + height)] != key {
                                break 'grow;
                            }
                        }
                        height += 1;
                    }

                    #[allow(clippy::cast_possible_truncation)]
                    let material = ((key >> 8) & 0xFF) as u8;
                    #[allow(clippy::cast_possible_truncation)]
                    let ao_signature = (key & 0xFF) as u8;

                    let appended = append_greedy_face_quad(
                        base_mesh,
                        face,
                        slice,
                        u,
                        v,
                        width,
                        height,
                        material,
                        ao_signature,
                        0,
                    );
                    if !appended {
                        // Encoding limit: emit the rectangle voxel by
                        // voxel rather than dropping geometry.
                        for emit_v in 0..height {
                            for emit_u in 0..width {
                                let pos =
                                    slice_cell_to_voxel(face, slice, u + emit_u, v + emit_v);
                                append_voxel_face(
                                    chunk,
                                    base_mesh,
                                    pos.x,
                                    pos.y,
                                    pos.z,
                                    face,
                                    u32::from(material),
                                    0,
                                );
                            }
                        }
                    }

                    for clear_v in 0..height {
                        for clear_u in 0..width {
                            mask[mask_index(u + clear_u, v + clear_v)] = EMPTY_MASK_KEY;
                        }
                    }

                    u += width;
                }
            }
        }
    }

    meshes
}
