//! # BLOCKFORGE
//!
//! The deterministic voxel-world core of a block-factory sandbox.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        BLOCKFORGE CORE                           │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │  edits ──> CSG volume ──> chunks ──┬──> mesher ──> handoff ──>   │
//! │                                    │      (per dirty chunk)      │
//! │                                    │                             │
//! │                                    └──> clipmap index ──>        │
//! │                                           visible chunk list     │
//! │                                                                  │
//! │  The GPU backend is an external collaborator: it pulls meshes,   │
//! │  instances, and visibility lists; the core never calls into it.  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `session`: the edit-thread world session (the public operation set)
//! - `facade`: mesh cache, rebuild scheduling, observation hooks
//! - `grass`: per-chunk grass instance extraction
//! - `vox`: thin MagicaVoxel static-mesh intake

pub mod facade;
pub mod grass;
pub mod session;
pub mod vox;

// Re-export the subsystem crates.
pub use blockforge_core as core;
pub use blockforge_mesh as mesh;
pub use blockforge_network as network;
pub use blockforge_spatial as spatial;
pub use blockforge_world as world;

// Re-export commonly used types.
pub use facade::{ObservedQueryStats, RenderFacade, StaticMeshDraw};
pub use grass::{grass_instances, GrassInstance};
pub use session::WorldSession;
pub use vox::{load_vox_static_mesh, VoxError};
