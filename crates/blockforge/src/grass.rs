//! Per-chunk grass billboard instance extraction.
//!
//! The renderer instances one billboard per exposed grass voxel. The
//! core side only decides WHERE instances go and hands out a
//! deterministic per-cell phase so sway animation survives reloads.

use blockforge_core::Cell3;
use blockforge_world::{ChunkGrid, VoxelKind, CHUNK_SIZE};

/// One grass billboard instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrassInstance {
    /// The world cell the billboard stands in.
    pub cell: Cell3,
    /// Deterministic per-cell phase byte for sway animation.
    pub phase: u8,
}

/// Integer mix of a world cell, stable across runs and hosts.
#[inline]
#[must_use]
#[allow(clippy::cast_sign_loss)]
fn cell_hash(cell: Cell3) -> u32 {
    let mut h = cell.x as u32;
    h ^= (cell.y as u32).wrapping_mul(0x9E37_79B1);
    h ^= (cell.z as u32).wrapping_mul(0x85EB_CA77);
    h
}

/// Extracts the grass instances of one chunk.
///
/// One instance per `Grass` voxel whose +Y neighbour is empty, emitted
/// in Y, Z, X order. Unknown chunk indices yield an empty list.
#[must_use]
pub fn grass_instances(grid: &ChunkGrid, chunk_index: usize) -> Vec<GrassInstance> {
    let Some(chunk) = grid.chunks().get(chunk_index) else {
        return Vec::new();
    };

    let origin = chunk.world_origin();
    let mut instances = Vec::new();
    for y in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                if chunk.voxel_at(x, y, z).kind != VoxelKind::Grass {
                    continue;
                }
                // The top of the chunk counts as open sky.
                if chunk.voxel_at(x, y + 1, z).is_solid() {
                    continue;
                }

                let cell = origin + Cell3::new(x, y, z);
                #[allow(clippy::cast_possible_truncation)]
                let phase = (cell_hash(cell) & 0xFF) as u8;
                instances.push(GrassInstance { cell, phase });
            }
        }
    }
    instances
}
