//! Spatial query statistics shared by index backends.

/// Counters populated by clipmap updates and visibility queries.
///
/// Population is opt-in: every operation takes `Option<&mut Self>` and
/// skips the bookkeeping entirely when given `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpatialQueryStats {
    /// Bricks visited during the last query.
    pub visited_node_count: u32,
    /// Chunk candidates gathered from visited bricks.
    pub candidate_chunk_count: u32,
    /// Chunks that passed the exact intersection test.
    pub visible_chunk_count: u32,
    /// Levels currently active in the index.
    pub clipmap_active_level_count: u32,
    /// Levels whose residency changed in the last camera update.
    pub clipmap_updated_level_count: u32,
    /// Distinct brick Z-rows touched in the last camera update.
    pub clipmap_updated_slab_count: u32,
    /// Bricks added or evicted in the last camera update.
    pub clipmap_updated_brick_count: u32,
    /// Total bricks currently resident across all levels.
    pub clipmap_resident_brick_count: u32,
}
