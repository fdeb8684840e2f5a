// Error types for catalog loading, flow solving and basket splitting

use crate::models::NodeIndex;
use std::path::PathBuf;

/// Errors raised while loading the eligibility catalog, a basket or a config file
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON input: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Low-level errors of the flow network and its solver
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("node {node} is out of range for a network of {node_count} nodes")]
    NodeOutOfRange { node: NodeIndex, node_count: usize },

    #[error("edge {from} -> {to} has negative capacity {capacity}")]
    NegativeCapacity {
        from: NodeIndex,
        to: NodeIndex,
        capacity: i64,
    },

    #[error("no edge pair {from} -> {to} to replace")]
    NoEdgeToReplace { from: NodeIndex, to: NodeIndex },

    #[error("negative cost cycle reachable from the source")]
    NegativeCycle,
}

/// Errors returned by [`crate::BasketSplitter::split`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error(
        "no delivery configuration routes all {item_count} items \
         across {delivery_count} deliveries"
    )]
    InfeasibleAssignment {
        item_count: usize,
        delivery_count: usize,
    },

    #[error("basket uses {found} distinct deliveries, the search is limited to {limit}")]
    TooManyDeliveries { found: usize, limit: usize },

    #[error("flow network invariant violated: {0}")]
    InvariantViolation(String),
}

impl From<FlowError> for SplitError {
    fn from(err: FlowError) -> Self {
        SplitError::InvariantViolation(err.to_string())
    }
}
