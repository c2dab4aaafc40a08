//! # Blockforge World
//!
//! Chunked voxel storage and the deterministic CSG command engine.
//!
//! ## Determinism Contract
//!
//! Every operation in this crate is integer-only and iteration orders are
//! fixed (Y-major, then Z, then X). Replaying the same command list over
//! equal initial state produces byte-identical voxel data on every host.

pub mod chunk;
pub mod chunk_grid;
pub mod csg;
pub mod error;
pub mod voxel;

pub use chunk::{Chunk, CHUNK_SIZE, CHUNK_VOLUME};
pub use chunk_grid::ChunkGrid;
pub use csg::{
    apply_csg_command, apply_csg_commands, brush_bounds, copy_volume_solids_to_chunk, Brush,
    BrushKind, CsgCell, CsgCommand, CsgOp, CsgVolume, AFFECT_ALL, AFFECT_EMPTY, AFFECT_SOLID,
};
pub use error::{WorldLoadError, WorldResult};
pub use voxel::{Voxel, VoxelKind};
