// Flow network model: adjacency lists over an edge arena with paired residual edges

use crate::error::FlowError;
use crate::models::{Capacity, Cost, Edge, EdgeIndex, Flow, NodeIndex};

/// Directed multigraph where every forward edge owns a residual counterpart
#[derive(Debug, Clone, Default)]
pub struct FlowNetwork {
    /// Edge indices leaving each node, in insertion order
    adjacency: Vec<Vec<EdgeIndex>>,

    /// All edges of the network, forward and residual
    edges: Vec<Edge>,

    /// Bumped on every structural change
    revision: u64,
}

impl FlowNetwork {
    /// Creates a network with `node_count` nodes and no edges
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
            edges: Vec::new(),
            revision: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges, residual edges included
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Structural revision; changes whenever an edge is added or replaced
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn edge(&self, index: EdgeIndex) -> &Edge {
        &self.edges[index]
    }

    /// Iterates over the edges leaving `node` together with their arena indices
    pub fn edges_from(&self, node: NodeIndex) -> impl Iterator<Item = (EdgeIndex, &Edge)> + '_ {
        self.adjacency[node]
            .iter()
            .map(move |&index| (index, &self.edges[index]))
    }

    /// The most recently added edge leaving `node`
    pub fn last_edge(&self, node: NodeIndex) -> Option<&Edge> {
        self.adjacency
            .get(node)
            .and_then(|list| list.last())
            .map(|&index| &self.edges[index])
    }

    /// Appends a forward edge and its residual (capacity 0, negated cost)
    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        capacity: Capacity,
        cost: Cost,
    ) -> Result<EdgeIndex, FlowError> {
        self.check_edge(from, to, capacity)?;

        let forward = self.edges.len();
        let residual = forward + 1;
        let edge = Edge::forward(from, to, capacity, cost, residual);
        let reverse = Edge::residual_of(&edge, forward);
        self.edges.push(edge);
        self.edges.push(reverse);
        self.adjacency[from].push(forward);
        self.adjacency[to].push(residual);
        self.revision += 1;

        Ok(forward)
    }

    /// Replaces the most recently added edge pair `from -> to` with a fresh pair.
    ///
    /// The old pair is unlinked from both adjacency lists and the new pair is appended
    /// at their tails, so a replaced edge always becomes the last edge leaving `from`.
    pub fn update_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        capacity: Capacity,
        cost: Cost,
    ) -> Result<EdgeIndex, FlowError> {
        self.check_edge(from, to, capacity)?;

        let position = self.adjacency[from]
            .iter()
            .rposition(|&index| {
                let edge = &self.edges[index];
                edge.to == to && !edge.is_residual()
            })
            .ok_or(FlowError::NoEdgeToReplace { from, to })?;
        let forward = self.adjacency[from].remove(position);
        let residual = self.edges[forward].residual;
        let residual_position = self.adjacency[to]
            .iter()
            .rposition(|&index| index == residual)
            .ok_or(FlowError::NoEdgeToReplace { from, to })?;
        self.adjacency[to].remove(residual_position);

        // Reuse the arena slots of the removed pair so toggling never grows the network
        let edge = Edge::forward(from, to, capacity, cost, residual);
        self.edges[residual] = Edge::residual_of(&edge, forward);
        self.edges[forward] = edge;
        self.adjacency[from].push(forward);
        self.adjacency[to].push(residual);
        self.revision += 1;

        Ok(forward)
    }

    /// Pushes `amount` units through an edge, keeping its residual in sync
    pub fn augment(&mut self, index: EdgeIndex, amount: Flow) {
        let residual = self.edges[index].residual;
        self.edges[index].flow += amount;
        self.edges[residual].flow -= amount;
    }

    /// Removes all flow from the network
    pub fn reset_flow(&mut self) {
        for edge in &mut self.edges {
            edge.flow = 0;
        }
    }

    fn check_edge(
        &self,
        from: NodeIndex,
        to: NodeIndex,
        capacity: Capacity,
    ) -> Result<(), FlowError> {
        let node_count = self.node_count();
        for node in [from, to] {
            if node >= node_count {
                return Err(FlowError::NodeOutOfRange { node, node_count });
            }
        }
        if capacity < 0 {
            return Err(FlowError::NegativeCapacity { from, to, capacity });
        }
        Ok(())
    }
}
