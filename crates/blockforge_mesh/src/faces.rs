//! Shared face/corner tables and ambient-occlusion sampling.
//!
//! Both meshing modes and the preview mesh draw from these tables, so
//! winding, corner order, and AO agree everywhere. Face indices 0..=5
//! map 1:1 onto the six-direction order (+X, -X, +Y, -Y, +Z, -Z).

use blockforge_core::{Cell3, ALL_DIRS};
use blockforge_world::Chunk;

/// Sentinel mask key for "no face here" in the greedy sweep.
pub(crate) const EMPTY_MASK_KEY: u32 = 0xFFFF_FFFF;

/// Outward neighbour offset of a face.
#[inline]
pub(crate) fn face_normal(face: usize) -> Cell3 {
    ALL_DIRS[face].offset()
}

/// Per-face corner offsets on the unit cell, in winding order.
///
/// Winding is counter-clockwise viewed from outside; quads triangulate
/// as `[0,1,2, 0,2,3]`.
pub(crate) const FACE_CORNER_OFFSETS: [[Cell3; 4]; 6] = [
    // +X
    [
        Cell3::new(1, 0, 0),
        Cell3::new(1, 1, 0),
        Cell3::new(1, 1, 1),
        Cell3::new(1, 0, 1),
    ],
    // -X
    [
        Cell3::new(0, 0, 1),
        Cell3::new(0, 1, 1),
        Cell3::new(0, 1, 0),
        Cell3::new(0, 0, 0),
    ],
    // +Y
    [
        Cell3::new(0, 1, 0),
        Cell3::new(0, 1, 1),
        Cell3::new(1, 1, 1),
        Cell3::new(1, 1, 0),
    ],
    // -Y
    [
        Cell3::new(0, 0, 1),
        Cell3::new(0, 0, 0),
        Cell3::new(1, 0, 0),
        Cell3::new(1, 0, 1),
    ],
    // +Z
    [
        Cell3::new(1, 0, 1),
        Cell3::new(1, 1, 1),
        Cell3::new(0, 1, 1),
        Cell3::new(0, 0, 1),
    ],
    // -Z
    [
        Cell3::new(0, 0, 0),
        Cell3::new(0, 1, 0),
        Cell3::new(1, 1, 0),
        Cell3::new(1, 0, 0),
    ],
];

/// The two tangent axes used for AO sampling on a face.
#[inline]
pub(crate) fn face_ao_axes(face: usize) -> (Cell3, Cell3) {
    match face {
        0 | 1 => (Cell3::new(0, 1, 0), Cell3::new(0, 0, 1)),
        2 | 3 => (Cell3::new(1, 0, 0), Cell3::new(0, 0, 1)),
        _ => (Cell3::new(1, 0, 0), Cell3::new(0, 1, 0)),
    }
}

#[inline]
fn component_along(offset: Cell3, axis: Cell3) -> i32 {
    if axis.x != 0 {
        offset.x
    } else if axis.y != 0 {
        offset.y
    } else {
        offset.z
    }
}

/// Ambient-occlusion level for one corner of one face: 0 = fully
/// occluded, 3 = fully lit.
///
/// Samples the two side neighbours and the diagonal corner neighbour in
/// front of the face. Both sides solid count as full occlusion
/// regardless of the diagonal. Samples outside the chunk read empty.
pub(crate) fn corner_ao_level(chunk: &Chunk, x: i32, y: i32, z: i32, face: usize, corner: usize) -> u32 {
    debug_assert!(face < 6 && corner < 4);

    let normal = face_normal(face);
    let corner_offset = FACE_CORNER_OFFSETS[face][corner];
    let (u_axis, v_axis) = face_ao_axes(face);

    let u_sign = if component_along(corner_offset, u_axis) != 0 { 1 } else { -1 };
    let v_sign = if component_along(corner_offset, v_axis) != 0 { 1 } else { -1 };

    let base = Cell3::new(x, y, z) + normal;
    let u_step = u_axis * u_sign;
    let v_step = v_axis * v_sign;

    let side_a = {
        let c = base + u_step;
        chunk.is_solid(c.x, c.y, c.z)
    };
    let side_b = {
        let c = base + v_step;
        chunk.is_solid(c.x, c.y, c.z)
    };
    let corner_solid = {
        let c = base + u_step + v_step;
        chunk.is_solid(c.x, c.y, c.z)
    };

    let occlusion = if side_a && side_b {
        3
    } else {
        i32::from(side_a) + i32::from(side_b) + i32::from(corner_solid)
    };

    #[allow(clippy::cast_sign_loss)]
    {
        (3 - occlusion) as u32
    }
}

/// Packs the four 2-bit corner AO levels of a face into one byte, in
/// corner order. Part of the greedy merge key.
pub(crate) fn face_corner_ao_signature(chunk: &Chunk, x: i32, y: i32, z: i32, face: usize) -> u8 {
    let mut signature = 0u8;
    for corner in 0..4 {
        let ao = corner_ao_level(chunk, x, y, z, face, corner) & 0x3;
        #[allow(clippy::cast_possible_truncation)]
        {
            signature |= (ao as u8) << (corner * 2);
        }
    }
    signature
}

/// Maps a sweep-plane coordinate back to a voxel position.
///
/// X faces sweep YZ planes, Y faces sweep XZ planes, Z faces sweep XY
/// planes; the chunk is cubic so every plane is 16 x 16 over 16 slices.
#[inline]
pub(crate) fn slice_cell_to_voxel(face: usize, slice: i32, u: i32, v: i32) -> Cell3 {
    match face {
        0 | 1 => Cell3::new(slice, u, v),
        2 | 3 => Cell3::new(u, slice, v),
        _ => Cell3::new(u, v, slice),
    }
}

/// Grid-space position of one corner of a merged `width` x `height`
/// rectangle on a face, in the same winding order as
/// [`FACE_CORNER_OFFSETS`].
pub(crate) fn rect_corner_grid(
    face: usize,
    slice: i32,
    u: i32,
    v: i32,
    width: i32,
    height: i32,
    corner: usize,
) -> Cell3 {
    match face {
        // +X
        0 => match corner {
            0 => Cell3::new(slice + 1, u, v),
            1 => Cell3::new(slice + 1, u + width, v),
            2 => Cell3::new(slice + 1, u + width, v + height),
            _ => Cell3::new(slice + 1, u, v + height),
        },
        // -X
        1 => match corner {
            0 => Cell3::new(slice, u, v + height),
            1 => Cell3::new(slice, u + width, v + height),
            2 => Cell3::new(slice, u + width, v),
            _ => Cell3::new(slice, u, v),
        },
        // +Y
        2 => match corner {
            0 => Cell3::new(u, slice + 1, v),
            1 => Cell3::new(u, slice + 1, v + height),
            2 => Cell3::new(u + width, slice + 1, v + height),
            _ => Cell3::new(u + width, slice + 1, v),
        },
        // -Y
        3 => match corner {
            0 => Cell3::new(u, slice, v + height),
            1 => Cell3::new(u, slice, v),
            2 => Cell3::new(u + width, slice, v),
            _ => Cell3::new(u + width, slice, v + height),
        },
        // +Z
        4 => match corner {
            0 => Cell3::new(u + width, v, slice + 1),
            1 => Cell3::new(u + width, v + height, slice + 1),
            2 => Cell3::new(u, v + height, slice + 1),
            _ => Cell3::new(u, v, slice + 1),
        },
        // -Z
        _ => match corner {
            0 => Cell3::new(u, v, slice),
            1 => Cell3::new(u, v + height, slice),
            2 => Cell3::new(u + width, v + height, slice),
            _ => Cell3::new(u + width, v, slice),
        },
    }
}

/// Builds the greedy merge key from a material byte and an AO signature.
#[inline]
pub(crate) fn make_mask_key(material: u8, ao_signature: u8) -> u32 {
    (u32::from(material) << 8) | u32::from(ao_signature)
}
