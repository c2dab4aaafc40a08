//! The renderer-facing façade: per-chunk mesh cache, rebuild
//! scheduling, static-mesh intake, and the stats observation hook.
//!
//! Meshing itself stays a pure function; this layer owns the caches the
//! renderer reads and the handoff FIFO the GPU upload worker drains.

use parking_lot::Mutex;
use tracing::{debug, trace};

use blockforge_core::{MeshHandoff, Vec3};
use blockforge_mesh::{build_chunk_lod_meshes, ChunkLodMeshes, ChunkMeshData, MeshingOptions};
use blockforge_spatial::{ClipmapConfig, SpatialQueryStats};
use blockforge_world::ChunkGrid;

/// In-flight limit of the mesh handoff FIFO.
const MESH_HANDOFF_CAPACITY: usize = 64;

/// A static mesh registered through the intake entry point, with its
/// world-space placement offset.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticMeshDraw {
    /// The uploaded mesh.
    pub mesh: ChunkMeshData,
    /// World-space offset applied at draw time.
    pub world_offset: Vec3,
}

/// Snapshot of the last spatial-query stats observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObservedQueryStats {
    /// Whether the spatial index was used at all last frame.
    pub used: bool,
    /// The reported counters.
    pub stats: SpatialQueryStats,
    /// Visible chunks reported alongside the counters.
    pub visible_chunk_count: u32,
}

/// Renderer-facing mesh and observation state.
///
/// Owned by the edit thread; the GPU upload worker holds a clone of the
/// handoff only.
pub struct RenderFacade {
    options: MeshingOptions,
    clipmap_config: ClipmapConfig,
    lod_meshes: Vec<ChunkLodMeshes>,
    handoff: MeshHandoff<(usize, ChunkMeshData)>,
    static_meshes: Vec<StaticMeshDraw>,
    observed: Mutex<ObservedQueryStats>,
}

impl RenderFacade {
    /// Creates a façade with the given clipmap configuration and the
    /// default (greedy) meshing mode.
    #[must_use]
    pub fn new(clipmap_config: ClipmapConfig) -> Self {
        Self {
            options: MeshingOptions::GREEDY,
            clipmap_config,
            lod_meshes: Vec::new(),
            handoff: MeshHandoff::with_capacity(MESH_HANDOFF_CAPACITY),
            static_meshes: Vec::new(),
            observed: Mutex::new(ObservedQueryStats::default()),
        }
    }

    /// Overrides the meshing mode used by rebuilds.
    pub fn set_meshing_options(&mut self, options: MeshingOptions) {
        self.options = options;
    }

    /// Returns the configured clipmap parameters.
    #[must_use]
    pub fn clipmap_query_config(&self) -> ClipmapConfig {
        self.clipmap_config.clone()
    }

    /// Returns the handoff the GPU upload worker should clone and
    /// drain.
    #[must_use]
    pub const fn mesh_handoff(&self) -> &MeshHandoff<(usize, ChunkMeshData)> {
        &self.handoff
    }

    /// Returns the cached LOD meshes of a chunk, if built.
    #[must_use]
    pub fn chunk_lod_meshes(&self, chunk_index: usize) -> Option<&ChunkLodMeshes> {
        self.lod_meshes.get(chunk_index)
    }

    fn rebuild_one(&mut self, grid: &ChunkGrid, chunk_index: usize) -> bool {
        let Some(chunk) = grid.chunks().get(chunk_index) else {
            return false;
        };

        let lods = build_chunk_lod_meshes(chunk, self.options);
        if self.lod_meshes.len() <= chunk_index {
            self.lod_meshes
                .resize_with(chunk_index + 1, ChunkLodMeshes::default);
        }

        let merged = {
            // The handoff carries the LOD-merged buffer the uploader
            // binds directly.
            let mut merged = ChunkMeshData::default();
            for mesh in &lods.lod_meshes {
                #[allow(clippy::cast_possible_truncation)]
                let base_vertex = merged.vertices.len() as u32;
                merged.vertices.extend_from_slice(&mesh.vertices);
                merged.indices.extend(mesh.indices.iter().map(|i| base_vertex + i));
            }
            merged
        };
        self.lod_meshes[chunk_index] = lods;

        match self.handoff.publish((chunk_index, merged)) {
            Ok(generation) => {
                trace!(chunk_index, generation, "chunk mesh published");
            }
            Err(_) => {
                // The uploader is behind; it will re-read the cache once
                // it catches up, so dropping the publish is safe.
                debug!(chunk_index, "mesh handoff full, publish dropped");
            }
        }
        true
    }

    /// Rebuilds every chunk mesh in the grid.
    pub fn update_chunk_mesh(&mut self, grid: &ChunkGrid) -> bool {
        self.lod_meshes.truncate(grid.chunk_count());
        let mut all_ok = !grid.is_empty();
        for chunk_index in 0..grid.chunk_count() {
            all_ok &= self.rebuild_one(grid, chunk_index);
        }
        debug!(chunks = grid.chunk_count(), "full mesh rebuild");
        all_ok
    }

    /// Rebuilds one chunk mesh. Returns false for an unknown index.
    pub fn update_chunk_mesh_at(&mut self, grid: &ChunkGrid, chunk_index: usize) -> bool {
        self.rebuild_one(grid, chunk_index)
    }

    /// Rebuilds a set of chunk meshes. Unknown indices are skipped.
    pub fn update_chunk_meshes(&mut self, grid: &ChunkGrid, chunk_indices: &[usize]) -> bool {
        let mut all_ok = true;
        for &chunk_index in chunk_indices {
            all_ok &= self.rebuild_one(grid, chunk_index);
        }
        all_ok
    }

    /// Registers a static mesh (the MagicaVoxel intake entry point).
    pub fn upload_static_mesh(&mut self, mesh: ChunkMeshData, world_offset: Vec3) {
        self.static_meshes.push(StaticMeshDraw { mesh, world_offset });
    }

    /// Drops every registered static mesh.
    pub fn clear_static_meshes(&mut self) {
        self.static_meshes.clear();
    }

    /// Returns the registered static meshes in upload order.
    #[must_use]
    pub fn static_meshes(&self) -> &[StaticMeshDraw] {
        &self.static_meshes
    }

    /// Pure observation hook: records the spatial stats the renderer
    /// saw this frame. Never feeds back into core behavior.
    pub fn set_spatial_query_stats(
        &self,
        used: bool,
        stats: &SpatialQueryStats,
        visible_chunk_count: u32,
    ) {
        *self.observed.lock() = ObservedQueryStats {
            used,
            stats: *stats,
            visible_chunk_count,
        };
    }

    /// Returns the last observed spatial stats.
    #[must_use]
    pub fn observed_spatial_query_stats(&self) -> ObservedQueryStats {
        *self.observed.lock()
    }
}
