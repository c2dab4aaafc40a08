//! # Network Error Types

use thiserror::Error;

use crate::graph::NodeId;

/// Errors raised while building the transport graph.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// An edge span had zero length.
    #[error("invalid edge span: length must be at least 1 voxel")]
    InvalidSpan,

    /// An edge referenced a node id that was never added.
    #[error("unknown node id {0}")]
    UnknownNode(NodeId),
}

/// Result type for network graph operations.
pub type NetworkResult<T> = Result<T, NetworkError>;
