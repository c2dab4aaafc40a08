//! # Blockforge Network
//!
//! The transport-network layer: a typed adjacency graph for pipes,
//! belts, and tracks, the topology classification that selects join
//! pieces, and the fixed-point transform math shared with placement
//! code.
//!
//! Graph ownership follows integer ids over `Vec` storage - no pointer
//! adjacency, no reference cycles, O(1) lookup.

pub mod error;
pub mod graph;
pub mod pipes;
pub mod quant;
pub mod topology;

pub use error::{NetworkError, NetworkResult};
pub use graph::{Edge, EdgeId, EdgeSpan, NetworkGraph, NetworkKind, Node, NodeId, Socket};
pub use pipes::{build_pipe_endpoint_states, Pipe, PipeEndpointState};
pub use quant::{
    dequantize_angle_deg_q10, dequantize_euler_degrees, dequantize_fixed, dequantize_position,
    quantize_angle_deg_q10, quantize_fixed, quantize_transform, QuantizedTransform,
};
pub use topology::{
    classify_join_piece, connection_count, neighbor_mask_6, rasterize_span, JoinPiece,
};
