//! The ordered collection of chunks that represents world space, plus
//! its binary persistence.
//!
//! ## Binary world format (little-endian)
//!
//! ```text
//! offset 0 : magic        4 bytes, ASCII "VXW1"
//! offset 4 : version      u32, currently 2
//! offset 8 : chunk_count  u32
//! then per chunk:
//!   chunk_x i32, chunk_y i32, chunk_z i32
//!   voxels  4096 bytes of VoxelKind codes in storage order
//! ```
//!
//! A well-formed file is exactly `12 + chunk_count * (12 + 4096)` bytes.

use std::path::Path;

use tracing::{debug, info};

use blockforge_core::{floor_div, Cell3};

use crate::chunk::{Chunk, CHUNK_SIZE, CHUNK_VOLUME};
use crate::error::{WorldLoadError, WorldResult};
use crate::voxel::Voxel;

/// Canonical world-file magic.
pub const WORLD_MAGIC: [u8; 4] = *b"VXW1";

/// Current world-file version.
pub const WORLD_VERSION: u32 = 2;

const HEADER_BYTES: u64 = 12;
const CHUNK_RECORD_BYTES: u64 = 12 + CHUNK_VOLUME as u64;

/// Ordered sequence of chunks.
///
/// Mutation goes through whole-chunk replacement, [`ChunkGrid::set_voxel`]
/// at world coordinates, or CSG application via
/// [`crate::csg::copy_volume_solids_to_chunk`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkGrid {
    chunks: Vec<Chunk>,
}

impl ChunkGrid {
    /// Creates an empty grid with no chunks at all.
    #[must_use]
    pub const fn new() -> Self {
        Self { chunks: Vec::new() }
    }

    /// Resets to a single all-empty chunk at the origin.
    pub fn initialize_empty_world(&mut self) {
        self.chunks.clear();
        self.chunks.push(Chunk::new(0, 0, 0));
    }

    /// Resets to a minimal flat world: one chunk with a solid ground
    /// layer at y = 0.
    pub fn initialize_flat_world(&mut self) {
        self.chunks.clear();
        let mut chunk = Chunk::new(0, 0, 0);
        chunk.fill_layer(0, Voxel::new(crate::voxel::VoxelKind::Stone));
        self.chunks.push(chunk);
    }

    /// Returns the number of chunks.
    #[inline]
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if the grid holds no chunks.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns the chunks in order.
    #[inline]
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Returns the chunks mutably (whole-chunk replacement path).
    #[inline]
    pub fn chunks_mut(&mut self) -> &mut Vec<Chunk> {
        &mut self.chunks
    }

    /// Appends a chunk.
    pub fn push_chunk(&mut self, chunk: Chunk) {
        self.chunks.push(chunk);
    }

    /// Returns the index of the chunk containing `world_cell`, if any.
    #[must_use]
    pub fn chunk_index_containing(&self, world_cell: Cell3) -> Option<usize> {
        let cx = floor_div(world_cell.x, CHUNK_SIZE);
        let cy = floor_div(world_cell.y, CHUNK_SIZE);
        let cz = floor_div(world_cell.z, CHUNK_SIZE);
        self.chunks
            .iter()
            .position(|c| c.chunk_x() == cx && c.chunk_y() == cy && c.chunk_z() == cz)
    }

    /// Writes a voxel at world coordinates.
    ///
    /// Returns false when no chunk covers the cell; the world is not
    /// grown implicitly.
    pub fn set_voxel(&mut self, world_cell: Cell3, voxel: Voxel) -> bool {
        let Some(index) = self.chunk_index_containing(world_cell) else {
            return false;
        };
        let chunk = &mut self.chunks[index];
        let origin = chunk.world_origin();
        chunk.set_voxel(
            world_cell.x - origin.x,
            world_cell.y - origin.y,
            world_cell.z - origin.z,
            voxel,
        );
        true
    }

    /// Reads a voxel at world coordinates. Cells outside every chunk
    /// read as `Empty`.
    #[must_use]
    pub fn voxel_at(&self, world_cell: Cell3) -> Voxel {
        let Some(index) = self.chunk_index_containing(world_cell) else {
            return Voxel::EMPTY;
        };
        let chunk = &self.chunks[index];
        let origin = chunk.world_origin();
        chunk.voxel_at(
            world_cell.x - origin.x,
            world_cell.y - origin.y,
            world_cell.z - origin.z,
        )
    }

    /// Serializes the grid into the binary world format.
    #[must_use]
    pub fn to_binary(&self) -> Vec<u8> {
        let total = HEADER_BYTES as usize + self.chunks.len() * CHUNK_RECORD_BYTES as usize;
        let mut buf = Vec::with_capacity(total);
        buf.extend_from_slice(&WORLD_MAGIC);
        buf.extend_from_slice(&WORLD_VERSION.to_le_bytes());
        #[allow(clippy::cast_possible_truncation)]
        buf.extend_from_slice(&(self.chunks.len() as u32).to_le_bytes());
        for chunk in &self.chunks {
            buf.extend_from_slice(&chunk.chunk_x().to_le_bytes());
            buf.extend_from_slice(&chunk.chunk_y().to_le_bytes());
            buf.extend_from_slice(&chunk.chunk_z().to_le_bytes());
            buf.extend_from_slice(&chunk.encode_voxels());
        }
        buf
    }

    /// Parses a grid from binary world bytes.
    ///
    /// # Errors
    ///
    /// `Truncated` when not even a header is present, `BadMagic` /
    /// `BadVersion` on header rejection, `SizeMismatch` when the stream
    /// length disagrees with the declared chunk count.
    pub fn from_binary(bytes: &[u8]) -> WorldResult<Self> {
        if bytes.len() < HEADER_BYTES as usize {
            return Err(WorldLoadError::Truncated);
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        if magic != WORLD_MAGIC {
            return Err(WorldLoadError::BadMagic { found: magic });
        }

        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if version != WORLD_VERSION {
            return Err(WorldLoadError::BadVersion(version));
        }

        let chunk_count = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let expected = HEADER_BYTES + u64::from(chunk_count) * CHUNK_RECORD_BYTES;
        if bytes.len() as u64 != expected {
            return Err(WorldLoadError::SizeMismatch {
                expected,
                actual: bytes.len() as u64,
            });
        }

        let read_i32 = |at: usize| {
            i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        let mut chunks = Vec::with_capacity(chunk_count as usize);
        let mut offset = HEADER_BYTES as usize;
        for _ in 0..chunk_count {
            let x = read_i32(offset);
            let y = read_i32(offset + 4);
            let z = read_i32(offset + 8);
            offset += 12;

            let mut chunk = Chunk::new(x, y, z);
            chunk.decode_voxels(&bytes[offset..offset + CHUNK_VOLUME]);
            offset += CHUNK_VOLUME;
            chunks.push(chunk);
        }

        Ok(Self { chunks })
    }

    /// Saves the grid to a binary world file.
    ///
    /// The write is atomic only at the filesystem level; a partial write
    /// is recovered by re-saving, never by resuming.
    ///
    /// # Errors
    ///
    /// Any filesystem error surfaces as `WorldLoadError::Io`.
    pub fn save_to_binary_file<P: AsRef<Path>>(&self, path: P) -> WorldResult<()> {
        let bytes = self.to_binary();
        std::fs::write(path.as_ref(), &bytes)?;
        info!(
            chunks = self.chunks.len(),
            bytes = bytes.len(),
            path = %path.as_ref().display(),
            "world saved"
        );
        Ok(())
    }

    /// Loads a grid from a binary world file.
    ///
    /// # Errors
    ///
    /// See [`ChunkGrid::from_binary`] for rejection rules; filesystem
    /// errors surface as `WorldLoadError::Io`.
    pub fn load_from_binary_file<P: AsRef<Path>>(path: P) -> WorldResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let grid = Self::from_binary(&bytes)?;
        debug!(
            chunks = grid.chunk_count(),
            path = %path.as_ref().display(),
            "world loaded"
        );
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::VoxelKind;

    #[test]
    fn test_flat_world_ground_layer() {
        let mut grid = ChunkGrid::new();
        grid.initialize_flat_world();
        assert_eq!(grid.chunk_count(), 1);
        assert!(grid.chunks()[0].is_solid(0, 0, 0));
        assert!(grid.chunks()[0].is_solid(15, 0, 15));
        assert!(!grid.chunks()[0].is_solid(0, 1, 0));
    }

    #[test]
    fn test_set_voxel_world_coordinates() {
        let mut grid = ChunkGrid::new();
        grid.chunks_mut().push(Chunk::new(1, 0, -1));

        assert!(grid.set_voxel(Cell3::new(17, 3, -5), Voxel::new(VoxelKind::Wood)));
        assert_eq!(grid.voxel_at(Cell3::new(17, 3, -5)).kind, VoxelKind::Wood);

        // Outside the only chunk: refused, world unchanged.
        assert!(!grid.set_voxel(Cell3::new(-1, 0, 0), Voxel::new(VoxelKind::Wood)));
        assert_eq!(grid.voxel_at(Cell3::new(-1, 0, 0)).kind, VoxelKind::Empty);
    }

    #[test]
    fn test_binary_layout_sizes() {
        let mut grid = ChunkGrid::new();
        grid.initialize_empty_world();
        let bytes = grid.to_binary();
        assert_eq!(bytes.len(), 12 + 12 + 4096);
        assert_eq!(&bytes[0..4], b"VXW1");
        assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 2);
    }

    #[test]
    fn test_from_binary_rejects_bad_magic() {
        let mut grid = ChunkGrid::new();
        grid.initialize_empty_world();
        let mut bytes = grid.to_binary();
        bytes[0..4].copy_from_slice(b"NOPE");

        match ChunkGrid::from_binary(&bytes) {
            Err(WorldLoadError::BadMagic { found }) => assert_eq!(&found, b"NOPE"),
            other => panic!("expected BadMagic, got {other:?}"),
        }
    }

    #[test]
    fn test_from_binary_rejects_bad_version() {
        let mut grid = ChunkGrid::new();
        grid.initialize_empty_world();
        let mut bytes = grid.to_binary();
        bytes[4..8].copy_from_slice(&99u32.to_le_bytes());

        assert!(matches!(
            ChunkGrid::from_binary(&bytes),
            Err(WorldLoadError::BadVersion(99))
        ));
    }

    #[test]
    fn test_from_binary_rejects_short_header() {
        assert!(matches!(
            ChunkGrid::from_binary(b"VXW1\x02"),
            Err(WorldLoadError::Truncated)
        ));
    }

    #[test]
    fn test_from_binary_rejects_size_mismatch() {
        let mut grid = ChunkGrid::new();
        grid.initialize_empty_world();
        let mut bytes = grid.to_binary();
        bytes.truncate(bytes.len() - 1);

        assert!(matches!(
            ChunkGrid::from_binary(&bytes),
            Err(WorldLoadError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_round_trip_preserves_grid() {
        let mut grid = ChunkGrid::new();
        let mut chunk = Chunk::new(2, 0, -3);
        chunk.set_voxel(1, 1, 1, Voxel::new(VoxelKind::Stone));
        chunk.set_voxel(2, 1, 1, Voxel::new(VoxelKind::Dirt));
        grid.push_chunk(chunk);

        let restored = ChunkGrid::from_binary(&grid.to_binary()).expect("round trip");
        assert_eq!(restored, grid);
    }
}
