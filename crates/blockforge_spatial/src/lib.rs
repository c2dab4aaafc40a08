//! # Blockforge Spatial
//!
//! A clipmap-style hierarchical spatial index over the chunk grid:
//! nested, camera-centred brick grids whose residency is stable under
//! small camera motion, backing fast visibility queries over very large
//! worlds.

pub mod clipmap;
pub mod config;
pub mod stats;

pub use clipmap::ChunkClipmapIndex;
pub use config::{ClipmapConfig, ClipmapConfigError};
pub use stats::SpatialQueryStats;
