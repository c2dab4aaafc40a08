//! The hierarchical brick-residency cache and its queries.
//!
//! Each level quantizes world cells into bricks (brick size doubles per
//! level) and keeps the Chebyshev ball of bricks around the camera
//! resident. Residency updates are the set difference between the
//! previous and current balls, so a camera that stays inside its brick
//! produces zero updates by construction.

use std::collections::HashMap;

use tracing::debug;

use blockforge_core::{floor_div, Cell3, CellBox, Vec3};
use blockforge_world::ChunkGrid;

use crate::config::ClipmapConfig;
use crate::stats::SpatialQueryStats;

/// Chunk indices resident in one brick.
#[derive(Debug, Clone, Default)]
struct BrickResidency {
    chunks: Vec<usize>,
}

/// Per-level residency state.
#[derive(Debug, Clone)]
struct LevelState {
    brick_size_cells: i32,
    brick_radius: i32,
    center_brick: Option<Cell3>,
    resident: HashMap<Cell3, BrickResidency>,
}

impl LevelState {
    fn new(brick_size_cells: i32, brick_radius: i32) -> Self {
        Self {
            brick_size_cells,
            brick_radius,
            center_brick: None,
            resident: HashMap::new(),
        }
    }

    fn brick_bounds(&self, brick: Cell3) -> CellBox {
        let min = brick * self.brick_size_cells;
        CellBox::from_min_max(
            min,
            min + Cell3::new(
                self.brick_size_cells,
                self.brick_size_cells,
                self.brick_size_cells,
            ),
        )
    }
}

/// Clipmap spatial index over a chunk grid.
///
/// [`ChunkClipmapIndex::rebuild`] captures chunk bounds,
/// [`ChunkClipmapIndex::update_camera`] maintains brick residency, and
/// [`ChunkClipmapIndex::query_chunks_intersecting`] answers visibility
/// queries against resident bricks only.
#[derive(Debug, Clone, Default)]
pub struct ChunkClipmapIndex {
    config: ClipmapConfig,
    valid: bool,
    chunk_bounds: Vec<CellBox>,
    levels: Vec<LevelState>,
}

impl ChunkClipmapIndex {
    /// Creates an index with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClipmapConfig::default())
    }

    /// Creates an index with an explicit configuration.
    ///
    /// The configuration is taken as supplied; callers validate it once
    /// at load time.
    #[must_use]
    pub fn with_config(config: ClipmapConfig) -> Self {
        Self {
            config,
            valid: false,
            chunk_bounds: Vec::new(),
            levels: Vec::new(),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClipmapConfig {
        &self.config
    }

    /// Returns true if the index has been rebuilt over a non-empty grid.
    #[inline]
    #[must_use]
    pub const fn valid(&self) -> bool {
        self.valid
    }

    /// Rebuilds the index from a grid snapshot.
    ///
    /// Captures every chunk's world bounds and resets residency; the
    /// next camera update repopulates the brick cache. The index is
    /// valid iff the grid holds at least one chunk.
    #[allow(clippy::cast_possible_wrap)]
    pub fn rebuild(&mut self, grid: &ChunkGrid) {
        self.chunk_bounds.clear();
        self.chunk_bounds
            .extend(grid.chunks().iter().map(blockforge_world::Chunk::world_bounds));

        self.levels.clear();
        for level in 0..self.config.level_count {
            self.levels.push(LevelState::new(
                self.config.brick_size_cells(level) as i32,
                self.config.brick_radius_for_level(level) as i32,
            ));
        }

        self.valid = !grid.is_empty();
        debug!(
            chunks = self.chunk_bounds.len(),
            levels = self.levels.len(),
            valid = self.valid,
            "clipmap rebuilt"
        );
    }

    fn chunks_intersecting_brick(chunk_bounds: &[CellBox], brick_box: &CellBox) -> BrickResidency {
        let chunks = chunk_bounds
            .iter()
            .enumerate()
            .filter(|(_, bounds)| bounds.intersects(brick_box))
            .map(|(index, _)| index)
            .collect();
        BrickResidency { chunks }
    }

    /// Recentres every level on the camera and updates brick residency.
    ///
    /// A level whose camera brick did not change is left completely
    /// untouched; otherwise bricks entering the residency ball are
    /// added and bricks leaving it are evicted.
    #[allow(clippy::cast_possible_truncation)]
    pub fn update_camera(&mut self, camera_world_pos: Vec3, mut stats: Option<&mut SpatialQueryStats>) {
        if !self.valid {
            return;
        }

        let camera_cell = Cell3::new(
            camera_world_pos.x.floor() as i32,
            camera_world_pos.y.floor() as i32,
            camera_world_pos.z.floor() as i32,
        );

        let mut updated_level_count = 0u32;
        let mut updated_brick_count = 0u32;
        let mut updated_slab_count = 0u32;

        for level in &mut self.levels {
            let center = Cell3::new(
                floor_div(camera_cell.x, level.brick_size_cells),
                floor_div(camera_cell.y, level.brick_size_cells),
                floor_div(camera_cell.z, level.brick_size_cells),
            );

            // Hysteresis: no brick motion on this level, nothing to do.
            if level.center_brick == Some(center) {
                continue;
            }

            let radius = level.brick_radius;
            let in_ball = |brick: Cell3| {
                (brick.x - center.x).abs() <= radius
                    && (brick.y - center.y).abs() <= radius
                    && (brick.z - center.z).abs() <= radius
            };

            let mut touched_slabs: Vec<i32> = Vec::new();
            let mut level_updates = 0u32;

            // Evict bricks that left the ball.
            let evicted: Vec<Cell3> = level
                .resident
                .keys()
                .copied()
                .filter(|brick| !in_ball(*brick))
                .collect();
            for brick in evicted {
                level.resident.remove(&brick);
                level_updates += 1;
                if !touched_slabs.contains(&brick.z) {
                    touched_slabs.push(brick.z);
                }
            }

            // Add bricks that entered the ball.
            for bz in (center.z - radius)..=(center.z + radius) {
                for by in (center.y - radius)..=(center.y + radius) {
                    for bx in (center.x - radius)..=(center.x + radius) {
                        let brick = Cell3::new(bx, by, bz);
                        if level.resident.contains_key(&brick) {
                            continue;
                        }
                        let brick_box = level.brick_bounds(brick);
                        let residency =
                            Self::chunks_intersecting_brick(&self.chunk_bounds, &brick_box);
                        level.resident.insert(brick, residency);
                        level_updates += 1;
                        if !touched_slabs.contains(&bz) {
                            touched_slabs.push(bz);
                        }
                    }
                }
            }

            level.center_brick = Some(center);
            if level_updates > 0 {
                updated_level_count += 1;
                updated_brick_count += level_updates;
                updated_slab_count += touched_slabs.len() as u32;
            }
        }

        if let Some(stats) = stats.as_deref_mut() {
            stats.clipmap_active_level_count = self.levels.len() as u32;
            stats.clipmap_updated_level_count = updated_level_count;
            stats.clipmap_updated_brick_count = updated_brick_count;
            stats.clipmap_updated_slab_count = updated_slab_count;
            stats.clipmap_resident_brick_count = self
                .levels
                .iter()
                .map(|level| level.resident.len() as u32)
                .sum();
        }

        if updated_brick_count > 0 {
            debug!(
                levels = updated_level_count,
                bricks = updated_brick_count,
                "clipmap residency updated"
            );
        }
    }

    /// Returns the indices of chunks whose world AABB intersects the
    /// query box, visiting only resident bricks.
    ///
    /// Results are sorted ascending and deduplicated so the output is
    /// independent of brick iteration order. A query entirely outside
    /// the resident bricks returns an empty list.
    #[allow(clippy::cast_possible_truncation)]
    pub fn query_chunks_intersecting(
        &self,
        query: &CellBox,
        mut stats: Option<&mut SpatialQueryStats>,
    ) -> Vec<usize> {
        let mut visited_nodes = 0u32;
        let mut candidate_chunks = 0u32;
        let mut visible: Vec<usize> = Vec::new();

        if self.valid && query.valid && !query.is_empty() {
            for level in &self.levels {
                for (brick, residency) in &level.resident {
                    visited_nodes += 1;
                    if !level.brick_bounds(*brick).intersects(query) {
                        continue;
                    }
                    candidate_chunks += residency.chunks.len() as u32;
                    for &chunk_index in &residency.chunks {
                        if self.chunk_bounds[chunk_index].intersects(query) {
                            visible.push(chunk_index);
                        }
                    }
                }
            }
        }

        visible.sort_unstable();
        visible.dedup();

        if let Some(stats) = stats.as_deref_mut() {
            stats.visited_node_count = visited_nodes;
            stats.candidate_chunk_count = candidate_chunks;
            stats.visible_chunk_count = visible.len() as u32;
            stats.clipmap_resident_brick_count = self
                .levels
                .iter()
                .map(|level| level.resident.len() as u32)
                .sum();
        }

        visible
    }
}
