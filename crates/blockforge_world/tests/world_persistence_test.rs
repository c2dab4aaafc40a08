//! On-disk world persistence round-trip and rejection tests.

use std::path::PathBuf;

use blockforge_core::Cell3;
use blockforge_world::{Chunk, ChunkGrid, Voxel, VoxelKind, WorldLoadError};

struct TempFileGuard {
    path: PathBuf,
}

impl TempFileGuard {
    fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "blockforge_{tag}_{}_{:?}.vxw",
            std::process::id(),
            std::thread::current().id()
        ));
        let _ = std::fs::remove_file(&path);
        Self { path }
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[test]
fn test_save_load_round_trip_preserves_voxel_kinds() {
    let guard = TempFileGuard::new("roundtrip");

    let mut source = ChunkGrid::new();
    let mut chunk = Chunk::new(2, 0, -3);
    chunk.set_voxel(1, 1, 1, Voxel::new(VoxelKind::Stone));
    chunk.set_voxel(2, 1, 1, Voxel::new(VoxelKind::Dirt));
    chunk.set_voxel(3, 1, 1, Voxel::new(VoxelKind::Grass));
    chunk.set_voxel(4, 1, 1, Voxel::new(VoxelKind::Wood));
    chunk.set_voxel(5, 1, 1, Voxel::new(VoxelKind::SolidRed));
    source.push_chunk(chunk);

    source.save_to_binary_file(&guard.path).expect("save");

    let loaded = ChunkGrid::load_from_binary_file(&guard.path).expect("load");
    assert_eq!(loaded.chunk_count(), 1);

    let dst = &loaded.chunks()[0];
    assert_eq!(dst.chunk_x(), 2);
    assert_eq!(dst.chunk_y(), 0);
    assert_eq!(dst.chunk_z(), -3);
    assert_eq!(dst.voxel_at(1, 1, 1).kind, VoxelKind::Stone);
    assert_eq!(dst.voxel_at(2, 1, 1).kind, VoxelKind::Dirt);
    assert_eq!(dst.voxel_at(3, 1, 1).kind, VoxelKind::Grass);
    assert_eq!(dst.voxel_at(4, 1, 1).kind, VoxelKind::Wood);
    assert_eq!(dst.voxel_at(5, 1, 1).kind, VoxelKind::SolidRed);
    assert_eq!(loaded, source);
}

#[test]
fn test_load_rejects_bad_magic_with_well_formed_trailer() {
    let guard = TempFileGuard::new("bad_magic");

    // A byte-exact valid file except for the magic.
    let mut grid = ChunkGrid::new();
    grid.initialize_empty_world();
    let mut bytes = grid.to_binary();
    bytes[0..4].copy_from_slice(b"NOPE");
    std::fs::write(&guard.path, &bytes).expect("write");

    match ChunkGrid::load_from_binary_file(&guard.path) {
        Err(WorldLoadError::BadMagic { found }) => assert_eq!(&found, b"NOPE"),
        other => panic!("expected BadMagic, got {other:?}"),
    }
}

#[test]
fn test_load_rejects_truncated_header() {
    let guard = TempFileGuard::new("truncated");
    std::fs::write(&guard.path, b"VXW1\x02\x00").expect("write");

    assert!(matches!(
        ChunkGrid::load_from_binary_file(&guard.path),
        Err(WorldLoadError::Truncated)
    ));
}

#[test]
fn test_load_rejects_size_mismatch() {
    let guard = TempFileGuard::new("size_mismatch");

    let mut grid = ChunkGrid::new();
    grid.initialize_empty_world();
    let mut bytes = grid.to_binary();
    // Declare two chunks but carry one.
    bytes[8..12].copy_from_slice(&2u32.to_le_bytes());
    std::fs::write(&guard.path, &bytes).expect("write");

    assert!(matches!(
        ChunkGrid::load_from_binary_file(&guard.path),
        Err(WorldLoadError::SizeMismatch { .. })
    ));
}

#[test]
fn test_load_missing_file_surfaces_io() {
    let path = std::env::temp_dir().join("blockforge_does_not_exist.vxw");
    let _ = std::fs::remove_file(&path);

    assert!(matches!(
        ChunkGrid::load_from_binary_file(&path),
        Err(WorldLoadError::Io(_))
    ));
}

#[test]
fn test_resave_recovers_partial_write() {
    let guard = TempFileGuard::new("resave");

    let mut grid = ChunkGrid::new();
    grid.initialize_flat_world();
    grid.set_voxel(Cell3::new(4, 4, 4), Voxel::new(VoxelKind::Wood));

    // Simulate a torn write, then re-save over it.
    std::fs::write(&guard.path, b"VXW1 torn").expect("write");
    grid.save_to_binary_file(&guard.path).expect("resave");

    let loaded = ChunkGrid::load_from_binary_file(&guard.path).expect("load");
    assert_eq!(loaded, grid);
}
