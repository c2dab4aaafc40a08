//! The edit-thread world session.
//!
//! Owns the chunk grid, the CSG volume, the clipmap index, and the
//! renderer façade, and wires them into the public operation set:
//! initialize, edit, mesh, query, save, load.
//!
//! Ownership contract: everything here belongs to the edit/simulation
//! thread. The GPU upload worker only ever touches the mesh handoff it
//! cloned from the façade.

use tracing::debug;

use blockforge_core::{Cell3, CellBox, Vec3};
use blockforge_mesh::{ChunkLodMeshes, ChunkMeshData, MeshingOptions};
use blockforge_spatial::{ChunkClipmapIndex, ClipmapConfig, SpatialQueryStats};
use blockforge_world::{
    apply_csg_command, copy_volume_solids_to_chunk, ChunkGrid, CsgCell, CsgCommand, CsgVolume,
    Voxel, WorldResult,
};

use crate::facade::RenderFacade;

/// The deterministic world core behind the renderer.
pub struct WorldSession {
    grid: ChunkGrid,
    volume: CsgVolume,
    clipmap: ChunkClipmapIndex,
    facade: RenderFacade,
}

impl Default for WorldSession {
    fn default() -> Self {
        Self::new(ClipmapConfig::default())
    }
}

impl WorldSession {
    /// Creates a session with no world loaded yet.
    #[must_use]
    pub fn new(clipmap_config: ClipmapConfig) -> Self {
        Self {
            grid: ChunkGrid::new(),
            volume: CsgVolume::default(),
            clipmap: ChunkClipmapIndex::with_config(clipmap_config.clone()),
            facade: RenderFacade::new(clipmap_config),
        }
    }

    /// Returns the chunk grid.
    #[must_use]
    pub const fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    /// Returns the CSG volume mirroring the editable region.
    #[must_use]
    pub const fn volume(&self) -> &CsgVolume {
        &self.volume
    }

    /// Returns the renderer façade.
    #[must_use]
    pub const fn facade(&self) -> &RenderFacade {
        &self.facade
    }

    /// Returns the renderer façade mutably.
    pub fn facade_mut(&mut self) -> &mut RenderFacade {
        &mut self.facade
    }

    /// Rebuilds the CSG volume to cover the grid and mirrors every
    /// solid voxel into it.
    ///
    /// The volume is the authority CSG commands edit; keeping it in
    /// sync at (re)initialization means a later
    /// `copy_volume_solids_to_chunk` cannot erase pre-existing terrain.
    fn reset_volume_from_grid(&mut self) {
        let mut bounds = CellBox::INVALID;
        for chunk in self.grid.chunks() {
            bounds.include_box(&chunk.world_bounds());
        }
        if !bounds.valid || bounds.is_empty() {
            self.volume = CsgVolume::default();
            return;
        }

        let extent = bounds.max_exclusive - bounds.min_inclusive;
        self.volume = CsgVolume::new(extent.x, extent.y, extent.z, bounds.min_inclusive);

        for chunk in self.grid.chunks() {
            let origin = chunk.world_origin();
            for y in 0..blockforge_world::CHUNK_SIZE {
                for z in 0..blockforge_world::CHUNK_SIZE {
                    for x in 0..blockforge_world::CHUNK_SIZE {
                        let voxel = chunk.voxel_at(x, y, z);
                        if voxel.is_empty() {
                            continue;
                        }
                        self.volume.set_cell_at_world(
                            origin + Cell3::new(x, y, z),
                            CsgCell {
                                voxel,
                                material_id: u16::from(voxel.kind.material()),
                            },
                        );
                    }
                }
            }
        }
    }

    fn refresh_world_state(&mut self) {
        self.reset_volume_from_grid();
        self.clipmap.rebuild(&self.grid);
        self.facade.update_chunk_mesh(&self.grid);
    }

    /// Resets to a fresh world with one all-empty chunk.
    pub fn initialize_empty_world(&mut self) {
        self.grid.initialize_empty_world();
        self.refresh_world_state();
        debug!("empty world initialized");
    }

    /// Resets to the minimal flat world (one chunk, solid ground layer).
    pub fn initialize_flat_world(&mut self) {
        self.grid.initialize_flat_world();
        self.refresh_world_state();
        debug!("flat world initialized");
    }

    /// Writes one voxel at world coordinates, keeping the CSG volume in
    /// sync and remeshing the owning chunk.
    ///
    /// Returns false (a no-op) when no chunk covers the cell.
    pub fn set_voxel(&mut self, world_cell: Cell3, voxel: Voxel) -> bool {
        let Some(chunk_index) = self.grid.chunk_index_containing(world_cell) else {
            return false;
        };
        self.grid.set_voxel(world_cell, voxel);
        self.volume.set_cell_at_world(
            world_cell,
            CsgCell {
                voxel,
                material_id: u16::from(voxel.kind.material()),
            },
        );
        self.facade.update_chunk_mesh_at(&self.grid, chunk_index);
        true
    }

    /// Applies one CSG command: edits the volume, syncs the overlapped
    /// chunks, and schedules their remesh.
    ///
    /// Returns the dirty box of cells actually mutated; an invalid box
    /// means the command was a complete no-op.
    pub fn apply_csg(&mut self, command: &CsgCommand) -> CellBox {
        let dirty = apply_csg_command(&mut self.volume, command);
        if !dirty.valid || dirty.is_empty() {
            return dirty;
        }

        let mut remeshed: Vec<usize> = Vec::new();
        for (chunk_index, chunk) in self.grid.chunks_mut().iter_mut().enumerate() {
            if !chunk.world_bounds().intersects(&dirty) {
                continue;
            }
            let touched = copy_volume_solids_to_chunk(&self.volume, chunk);
            if touched.valid {
                remeshed.push(chunk_index);
            }
        }
        self.facade.update_chunk_meshes(&self.grid, &remeshed);

        debug!(chunks = remeshed.len(), "csg command applied");
        dirty
    }

    /// Builds one chunk's merged mesh. Unknown indices yield `None`.
    #[must_use]
    pub fn build_chunk_mesh(
        &self,
        chunk_index: usize,
        options: MeshingOptions,
    ) -> Option<ChunkMeshData> {
        self.grid
            .chunks()
            .get(chunk_index)
            .map(|chunk| blockforge_mesh::build_chunk_mesh(chunk, options))
    }

    /// Builds one chunk's LOD meshes. Unknown indices yield `None`.
    #[must_use]
    pub fn build_chunk_lod_meshes(
        &self,
        chunk_index: usize,
        options: MeshingOptions,
    ) -> Option<ChunkLodMeshes> {
        self.grid
            .chunks()
            .get(chunk_index)
            .map(|chunk| blockforge_mesh::build_chunk_lod_meshes(chunk, options))
    }

    /// Rebuilds the clipmap index over the current grid.
    pub fn rebuild_clipmap(&mut self) {
        self.clipmap.rebuild(&self.grid);
    }

    /// Recentres the clipmap on the camera.
    pub fn update_clipmap_camera(
        &mut self,
        camera_world_pos: Vec3,
        stats: Option<&mut SpatialQueryStats>,
    ) {
        self.clipmap.update_camera(camera_world_pos, stats);
    }

    /// Queries the chunk indices visible in a world-cell box, sorted
    /// ascending.
    #[must_use]
    pub fn query_visible_chunks(
        &self,
        bounds: &CellBox,
        stats: Option<&mut SpatialQueryStats>,
    ) -> Vec<usize> {
        self.clipmap.query_chunks_intersecting(bounds, stats)
    }

    /// Saves the world to a binary file.
    ///
    /// # Errors
    ///
    /// Filesystem errors surface as `WorldLoadError::Io`.
    pub fn save_world<P: AsRef<std::path::Path>>(&self, path: P) -> WorldResult<()> {
        self.grid.save_to_binary_file(path)
    }

    /// Loads a world from a binary file, replacing the current state.
    ///
    /// # Errors
    ///
    /// See `WorldLoadError` for the rejection rules. The session is
    /// unchanged on error.
    pub fn load_world<P: AsRef<std::path::Path>>(&mut self, path: P) -> WorldResult<()> {
        let grid = ChunkGrid::load_from_binary_file(path)?;
        self.grid = grid;
        self.refresh_world_state();
        Ok(())
    }
}
