//! Thin MagicaVoxel `.vox` static-mesh intake.
//!
//! Parses the RIFF-style container (magic, version, MAIN with SIZE +
//! XYZI children), rebuilds the model as a voxel chunk, and meshes it
//! through the naive mesher. This is the single static-mesh entry point
//! of the core; palette handling and multi-model scenes stay with the
//! asset pipeline.
//!
//! ```text
//! VOX File Structure:
//! ├── "VOX " (4 bytes) - Magic number
//! ├── Version (4 bytes) - File version (150)
//! └── MAIN Chunk
//!     ├── SIZE Chunk - Model dimensions
//!     └── XYZI Chunk - Voxel data
//! ```

use thiserror::Error;
use tracing::warn;

use blockforge_mesh::{build_chunk_mesh, ChunkMeshData, MeshingOptions};
use blockforge_world::{Chunk, Voxel, VoxelKind, CHUNK_SIZE};

/// VOX file magic number.
const VOX_MAGIC: [u8; 4] = *b"VOX ";

/// Expected VOX version.
const VOX_VERSION: u32 = 150;

/// Errors raised by the `.vox` intake.
#[derive(Error, Debug)]
pub enum VoxError {
    /// The byte stream is not a VOX container.
    #[error("invalid VOX format: {0}")]
    InvalidFormat(String),

    /// The container version is unsupported.
    #[error("unsupported VOX version: {0}")]
    UnsupportedVersion(u32),

    /// A required chunk was absent.
    #[error("missing required chunk: {0}")]
    MissingChunk(&'static str),

    /// A chunk's payload was malformed.
    #[error("invalid chunk: {0}")]
    InvalidChunk(String),
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, count: usize) -> Result<&'a [u8], VoxError> {
        let end = self
            .offset
            .checked_add(count)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| VoxError::InvalidFormat("unexpected end of stream".into()))?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, VoxError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_id(&mut self) -> Result<[u8; 4], VoxError> {
        let bytes = self.take(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Parses a `.vox` byte stream into a static mesh.
///
/// The first model's SIZE/XYZI pair is used. VOX files are Z-up; the
/// model is remapped to the engine's Y-up convention. Models larger
/// than one chunk are clamped to 16 cells per axis.
///
/// # Errors
///
/// Rejects wrong magic/version and malformed or missing chunks.
pub fn load_vox_static_mesh(bytes: &[u8]) -> Result<ChunkMeshData, VoxError> {
    let mut reader = Reader { bytes, offset: 0 };

    if reader.read_id()? != VOX_MAGIC {
        return Err(VoxError::InvalidFormat("bad magic".into()));
    }
    let version = reader.read_u32()?;
    if version != VOX_VERSION {
        return Err(VoxError::UnsupportedVersion(version));
    }

    if &reader.read_id()? != b"MAIN" {
        return Err(VoxError::MissingChunk("MAIN"));
    }
    let main_content = reader.read_u32()? as usize;
    let _children_size = reader.read_u32()?;
    // MAIN's own content is unused; its children follow.
    let _ = reader.take(main_content)?;

    let mut size: Option<(u32, u32, u32)> = None;
    let mut mesh_chunk: Option<Chunk> = None;

    while reader.offset < bytes.len() {
        let id = reader.read_id()?;
        let content_size = reader.read_u32()? as usize;
        let children_size = reader.read_u32()? as usize;
        let content = reader.take(content_size)?;

        match &id {
            b"SIZE" => {
                if content.len() < 12 {
                    return Err(VoxError::InvalidChunk("SIZE too short".into()));
                }
                let read = |at: usize| {
                    u32::from_le_bytes([
                        content[at],
                        content[at + 1],
                        content[at + 2],
                        content[at + 3],
                    ])
                };
                size = Some((read(0), read(4), read(8)));
            }
            b"XYZI" => {
                let (sx, sy, sz) =
                    size.ok_or(VoxError::MissingChunk("SIZE before XYZI"))?;
                if sx > CHUNK_SIZE as u32 || sy > CHUNK_SIZE as u32 || sz > CHUNK_SIZE as u32 {
                    warn!(sx, sy, sz, "vox model exceeds one chunk, clamping");
                }

                if content.len() < 4 {
                    return Err(VoxError::InvalidChunk("XYZI too short".into()));
                }
                let voxel_count = u32::from_le_bytes([
                    content[0], content[1], content[2], content[3],
                ]) as usize;
                if content.len() < 4 + voxel_count * 4 {
                    return Err(VoxError::InvalidChunk("XYZI voxel list truncated".into()));
                }

                let mut chunk = Chunk::new(0, 0, 0);
                for i in 0..voxel_count {
                    let at = 4 + i * 4;
                    let (vx, vy, vz) = (content[at], content[at + 1], content[at + 2]);
                    // VOX is Z-up: (x, y, z) -> engine (x, z, y).
                    chunk.set_voxel(
                        i32::from(vx),
                        i32::from(vz),
                        i32::from(vy),
                        Voxel::new(VoxelKind::Stone),
                    );
                }
                mesh_chunk = Some(chunk);
                // First model only; stop scanning.
                break;
            }
            _ => {
                // Skip palettes, materials, and scene-graph chunks.
                let _ = reader.take(children_size)?;
            }
        }
    }

    let chunk = mesh_chunk.ok_or(VoxError::MissingChunk("XYZI"))?;
    Ok(build_chunk_mesh(&chunk, MeshingOptions::NAIVE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_chunk(buf: &mut Vec<u8>, id: &[u8; 4], content: &[u8]) {
        buf.extend_from_slice(id);
        #[allow(clippy::cast_possible_truncation)]
        buf.extend_from_slice(&(content.len() as u32).to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(content);
    }

    fn single_voxel_vox() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"VOX ");
        buf.extend_from_slice(&150u32.to_le_bytes());
        push_chunk(&mut buf, b"MAIN", &[]);

        let mut size = Vec::new();
        size.extend_from_slice(&2u32.to_le_bytes());
        size.extend_from_slice(&2u32.to_le_bytes());
        size.extend_from_slice(&2u32.to_le_bytes());
        push_chunk(&mut buf, b"SIZE", &size);

        let mut xyzi = Vec::new();
        xyzi.extend_from_slice(&1u32.to_le_bytes());
        xyzi.extend_from_slice(&[1, 0, 1, 79]);
        push_chunk(&mut buf, b"XYZI", &xyzi);
        buf
    }

    #[test]
    fn test_single_voxel_model_meshes_as_cube() {
        let mesh = load_vox_static_mesh(&single_voxel_vox()).expect("parse");
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        // Z-up remap: vox (1, 0, 1) lands at engine (1, 1, 0).
        assert_eq!(mesh.vertices[0].x(), 1);
        assert_eq!(mesh.vertices[0].y(), 1);
        assert_eq!(mesh.vertices[0].z(), 0);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = single_voxel_vox();
        bytes[0..4].copy_from_slice(b"NOPE");
        assert!(matches!(
            load_vox_static_mesh(&bytes),
            Err(VoxError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_unsupported_version() {
        let mut bytes = single_voxel_vox();
        bytes[4..8].copy_from_slice(&151u32.to_le_bytes());
        assert!(matches!(
            load_vox_static_mesh(&bytes),
            Err(VoxError::UnsupportedVersion(151))
        ));
    }

    #[test]
    fn test_rejects_missing_model() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"VOX ");
        buf.extend_from_slice(&150u32.to_le_bytes());
        push_chunk(&mut buf, b"MAIN", &[]);
        assert!(matches!(
            load_vox_static_mesh(&buf),
            Err(VoxError::MissingChunk("XYZI"))
        ));
    }

    #[test]
    fn test_rejects_truncated_voxel_list() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"VOX ");
        buf.extend_from_slice(&150u32.to_le_bytes());
        push_chunk(&mut buf, b"MAIN", &[]);

        let mut size = Vec::new();
        size.extend_from_slice(&1u32.to_le_bytes());
        size.extend_from_slice(&1u32.to_le_bytes());
        size.extend_from_slice(&1u32.to_le_bytes());
        push_chunk(&mut buf, b"SIZE", &size);

        let mut xyzi = Vec::new();
        xyzi.extend_from_slice(&5u32.to_le_bytes());
        xyzi.extend_from_slice(&[0, 0, 0, 1]);
        push_chunk(&mut buf, b"XYZI", &xyzi);

        assert!(matches!(
            load_vox_static_mesh(&buf),
            Err(VoxError::InvalidChunk(_))
        ));
    }
}
