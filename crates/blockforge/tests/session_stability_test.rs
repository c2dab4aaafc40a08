//! End-to-end session behavior: edits flow through the CSG volume into
//! chunks, meshes, and visibility queries; worlds survive save/load.

use std::path::PathBuf;

use blockforge::core::{Cell3, CellBox, Vec3};
use blockforge::mesh::MeshingOptions;
use blockforge::session::WorldSession;
use blockforge::spatial::SpatialQueryStats;
use blockforge::world::{
    Brush, BrushKind, CsgCommand, CsgOp, Voxel, VoxelKind, AFFECT_ALL, AFFECT_SOLID,
};

struct TempFileGuard {
    path: PathBuf,
}

impl TempFileGuard {
    fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "blockforge_session_{tag}_{}.vxw",
            std::process::id()
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

fn box_command(op: CsgOp, min: Cell3, max: Cell3, material_id: u16, affect_mask: u16) -> CsgCommand {
    CsgCommand {
        op,
        brush: Brush {
            kind: BrushKind::Box,
            min_cell: min,
            max_cell: max,
            ..Brush::default()
        },
        material_id,
        affect_mask,
    }
}

#[test]
fn test_build_carve_paint_pipeline() {
    let mut session = WorldSession::default();
    session.initialize_empty_world();

    // Build a hollow block the way the editor would.
    let dirty = session.apply_csg(&box_command(
        CsgOp::AddSolid,
        Cell3::new(1, 1, 1),
        Cell3::new(4, 4, 4),
        3,
        AFFECT_ALL,
    ));
    assert_eq!(dirty.min_inclusive, Cell3::new(1, 1, 1));
    assert_eq!(dirty.max_exclusive, Cell3::new(4, 4, 4));
    assert_eq!(session.volume().solid_cell_count(), 27);

    session.apply_csg(&box_command(
        CsgOp::SubtractSolid,
        Cell3::new(2, 2, 2),
        Cell3::new(3, 3, 3),
        0,
        AFFECT_ALL,
    ));
    assert_eq!(session.volume().solid_cell_count(), 26);

    session.apply_csg(&box_command(
        CsgOp::PaintMaterial,
        Cell3::new(1, 1, 1),
        Cell3::new(4, 4, 4),
        7,
        AFFECT_SOLID,
    ));
    assert_eq!(session.volume().cell_at_world(Cell3::new(1, 1, 1)).material_id, 7);
    assert_eq!(session.volume().cell_at_world(Cell3::new(2, 2, 2)).material_id, 0);

    // The chunk mirrors the volume.
    assert!(session.grid().chunks()[0].is_solid(1, 1, 1));
    assert!(!session.grid().chunks()[0].is_solid(2, 2, 2));

    // The façade cached a mesh and the greedy surface is non-empty.
    let cached = session.facade().chunk_lod_meshes(0).expect("cached mesh");
    assert!(!cached.base_mesh().is_empty());

    let rebuilt = session
        .build_chunk_mesh(0, MeshingOptions::GREEDY)
        .expect("chunk exists");
    assert_eq!(&rebuilt, &blockforge::mesh::build_chunk_mesh(
        &session.grid().chunks()[0],
        MeshingOptions::GREEDY,
    ));
}

#[test]
fn test_visibility_pipeline() {
    let mut session = WorldSession::default();
    session.initialize_flat_world();

    let mut update_stats = SpatialQueryStats::default();
    session.update_clipmap_camera(Vec3::new(8.0, 8.0, 8.0), Some(&mut update_stats));
    assert!(update_stats.clipmap_resident_brick_count > 0);

    let near = CellBox::from_min_max(Cell3::new(0, 0, 0), Cell3::new(16, 16, 16));
    let mut query_stats = SpatialQueryStats::default();
    let visible = session.query_visible_chunks(&near, Some(&mut query_stats));
    assert_eq!(visible, vec![0]);
    assert_eq!(query_stats.visible_chunk_count, 1);

    // Feed the observation hook the way the renderer does.
    session
        .facade()
        .set_spatial_query_stats(true, &query_stats, query_stats.visible_chunk_count);
    assert!(session.facade().observed_spatial_query_stats().used);

    let far = CellBox::from_min_max(
        Cell3::new(100_000, 100_000, 100_000),
        Cell3::new(100_032, 100_032, 100_032),
    );
    assert!(session.query_visible_chunks(&far, None).is_empty());
}

#[test]
fn test_save_load_round_trip_through_session() {
    let guard = TempFileGuard::new("roundtrip");

    let mut session = WorldSession::default();
    session.initialize_empty_world();
    session.set_voxel(Cell3::new(1, 1, 1), Voxel::new(VoxelKind::Grass));
    session.set_voxel(Cell3::new(2, 1, 1), Voxel::new(VoxelKind::Wood));
    session.save_world(&guard.path).expect("save");

    let mut restored = WorldSession::default();
    restored.load_world(&guard.path).expect("load");

    assert_eq!(restored.grid(), session.grid());
    assert_eq!(
        restored.grid().voxel_at(Cell3::new(1, 1, 1)).kind,
        VoxelKind::Grass
    );
    // The volume reseeds from the loaded grid.
    assert_eq!(restored.volume().solid_cell_count(), 2);
    // Meshes were rebuilt for the loaded world.
    assert!(restored.facade().chunk_lod_meshes(0).is_some());
}

#[test]
fn test_load_failure_leaves_session_untouched() {
    let guard = TempFileGuard::new("bad_load");
    std::fs::write(&guard.path, b"NOPE definitely not a world").expect("write");

    let mut session = WorldSession::default();
    session.initialize_flat_world();
    let before = session.grid().clone();

    assert!(session.load_world(&guard.path).is_err());
    assert_eq!(session.grid(), &before);
}

#[test]
fn test_transport_surface_through_facade() {
    use blockforge::network::{
        build_pipe_endpoint_states, classify_join_piece, neighbor_mask_6, JoinPiece, Pipe,
    };
    use blockforge::core::Dir6;

    // A vertical riser teeing into a horizontal run.
    let pipes = [
        Pipe {
            cell: Cell3::new(0, 0, 0),
            axis: Vec3::X,
            radius: 0.3,
        },
        Pipe {
            cell: Cell3::new(1, 0, 0),
            axis: Vec3::X,
            radius: 0.3,
        },
        Pipe {
            cell: Cell3::new(1, 1, 0),
            axis: Vec3::Y,
            radius: 0.3,
        },
        Pipe {
            cell: Cell3::new(2, 0, 0),
            axis: Vec3::X,
            radius: 0.3,
        },
    ];

    let states = build_pipe_endpoint_states(&pipes);
    assert_eq!(states.len(), pipes.len());
    // The middle run segment gains the branch boost.
    assert!(states[1].rendered_radius > states[0].rendered_radius);
    // The riser's lower endpoint extends toward the run it tees into.
    assert!(states[2].start_extension > 0.0);

    let mask = neighbor_mask_6(Cell3::new(1, 0, 0), |cell| {
        pipes.iter().any(|pipe| pipe.cell == cell)
    });
    assert_eq!(
        mask,
        Dir6::PosX.bit() | Dir6::NegX.bit() | Dir6::PosY.bit()
    );
    assert_eq!(classify_join_piece(mask), JoinPiece::Tee);
}

#[test]
fn test_grass_instances_follow_edits() {
    let mut session = WorldSession::default();
    session.initialize_empty_world();
    session.set_voxel(Cell3::new(4, 0, 4), Voxel::new(VoxelKind::Grass));

    let instances = blockforge::grass_instances(session.grid(), 0);
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].cell, Cell3::new(4, 0, 4));

    // Burying the grass removes its instance.
    session.set_voxel(Cell3::new(4, 1, 4), Voxel::new(VoxelKind::Stone));
    assert!(blockforge::grass_instances(session.grid(), 0).is_empty());
}
