// Edge model representing one arc of the residual flow network

use crate::models::{Capacity, Cost, EdgeIndex, Flow, NodeIndex};

/// Represents a directed edge together with the index of its residual counterpart
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Tail node of the edge
    pub from: NodeIndex,

    /// Head node of the edge
    pub to: NodeIndex,

    /// Capacity the edge was created with (0 for residual edges)
    pub capacity: Capacity,

    /// Cost per unit of flow used by path search
    pub cost: Cost,

    /// Cost the edge was created with, used to price augmented flow
    pub original_cost: Cost,

    /// Current flow through the edge
    pub flow: Flow,

    /// Arena index of the paired edge
    pub residual: EdgeIndex,

    /// Whether this is the residual half of a pair
    reverse: bool,
}

impl Edge {
    /// Creates a forward edge without flow
    pub fn forward(
        from: NodeIndex,
        to: NodeIndex,
        capacity: Capacity,
        cost: Cost,
        residual: EdgeIndex,
    ) -> Self {
        Self {
            from,
            to,
            capacity,
            cost,
            original_cost: cost,
            flow: 0,
            residual,
            reverse: false,
        }
    }

    /// Creates the residual counterpart of `forward`: zero capacity, negated cost
    pub fn residual_of(forward: &Edge, forward_index: EdgeIndex) -> Self {
        Self {
            from: forward.to,
            to: forward.from,
            capacity: 0,
            cost: -forward.cost,
            original_cost: -forward.cost,
            flow: 0,
            residual: forward_index,
            reverse: true,
        }
    }

    pub fn is_residual(&self) -> bool {
        self.reverse
    }

    /// Capacity still available on this edge
    pub fn remaining_capacity(&self) -> Capacity {
        self.capacity - self.flow
    }
}
