//! Min-cost max-flow by successive shortest augmenting paths.
//!
//! Shortest paths are found with a full Bellman-Ford relaxation over every edge that
//! still has remaining capacity, so residual edges with negative cost are handled
//! without potentials. A negative cycle reachable from the source is reported as an
//! error instead of looping forever.

use log::trace;

use crate::error::FlowError;
use crate::models::{Capacity, Cost, EdgeIndex, Flow, FlowNetwork, NodeIndex};

/// Distance of nodes not reached by the relaxation
const UNREACHED: Cost = Cost::MAX / 2;

/// Maximum flow and the minimum cost among all flows of that value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowSummary {
    pub max_flow: Flow,
    pub min_cost: Cost,
}

/// Min-cost max-flow solver owning the network it solves
#[derive(Debug, Clone)]
pub struct MinCostMaxFlow {
    network: FlowNetwork,
    source: NodeIndex,
    sink: NodeIndex,

    /// Summary of the last solve and the network revision it belongs to
    solved: Option<(u64, FlowSummary)>,
}

impl MinCostMaxFlow {
    /// Creates a solver over an empty network with `node_count` nodes
    pub fn with_nodes(
        node_count: usize,
        source: NodeIndex,
        sink: NodeIndex,
    ) -> Result<Self, FlowError> {
        Self::new(FlowNetwork::new(node_count), source, sink)
    }

    /// Creates a solver for an existing network
    pub fn new(
        network: FlowNetwork,
        source: NodeIndex,
        sink: NodeIndex,
    ) -> Result<Self, FlowError> {
        let node_count = network.node_count();
        for node in [source, sink] {
            if node >= node_count {
                return Err(FlowError::NodeOutOfRange { node, node_count });
            }
        }

        Ok(Self {
            network,
            source,
            sink,
            solved: None,
        })
    }

    pub fn network(&self) -> &FlowNetwork {
        &self.network
    }

    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn sink(&self) -> NodeIndex {
        self.sink
    }

    /// Adds an edge pair; invalidates any cached solution
    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        capacity: Capacity,
        cost: Cost,
    ) -> Result<EdgeIndex, FlowError> {
        self.network.add_edge(from, to, capacity, cost)
    }

    /// Replaces the latest edge pair `from -> to`; invalidates any cached solution
    pub fn update_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        capacity: Capacity,
        cost: Cost,
    ) -> Result<EdgeIndex, FlowError> {
        self.network.update_edge(from, to, capacity, cost)
    }

    /// Checks if the cached summary still describes the current network
    pub fn is_solved(&self) -> bool {
        matches!(self.solved, Some((revision, _)) if revision == self.network.revision())
    }

    pub fn max_flow(&mut self) -> Result<Flow, FlowError> {
        Ok(self.solve()?.max_flow)
    }

    pub fn min_cost(&mut self) -> Result<Cost, FlowError> {
        Ok(self.solve()?.min_cost)
    }

    /// Solves the network in its current state.
    ///
    /// Repeated calls without an intervening mutation return the cached summary.
    pub fn solve(&mut self) -> Result<FlowSummary, FlowError> {
        let revision = self.network.revision();
        if let Some((solved_revision, summary)) = self.solved {
            if solved_revision == revision {
                return Ok(summary);
            }
        }

        self.network.reset_flow();
        let mut summary = FlowSummary::default();

        while let Some(path) = self.find_augmenting_path()? {
            let bottleneck = path
                .iter()
                .map(|&index| self.network.edge(index).remaining_capacity())
                .min()
                .unwrap_or(0);
            if bottleneck <= 0 {
                break;
            }

            for &index in &path {
                self.network.augment(index, bottleneck);
                summary.min_cost += bottleneck * self.network.edge(index).original_cost;
            }
            summary.max_flow += bottleneck;
            trace!(
                "augmented {} units along {} edges, cost so far {}",
                bottleneck,
                path.len(),
                summary.min_cost
            );
        }

        self.solved = Some((revision, summary));
        Ok(summary)
    }

    /// Cheapest source-to-sink path over edges with remaining capacity
    fn find_augmenting_path(&self) -> Result<Option<Vec<EdgeIndex>>, FlowError> {
        let node_count = self.network.node_count();
        let mut distances = vec![UNREACHED; node_count];
        let mut predecessors: Vec<Option<EdgeIndex>> = vec![None; node_count];
        distances[self.source] = 0;

        let mut converged = false;
        for _ in 1..node_count {
            if !self.relax(&mut distances, &mut predecessors) {
                converged = true;
                break;
            }
        }
        // Anything still relaxing after N - 1 rounds lies on a negative cycle
        if !converged && self.relax(&mut distances, &mut predecessors) {
            return Err(FlowError::NegativeCycle);
        }

        if distances[self.sink] == UNREACHED {
            return Ok(None);
        }

        let mut path = Vec::new();
        let mut node = self.sink;
        while let Some(index) = predecessors[node] {
            path.push(index);
            if path.len() > node_count {
                return Err(FlowError::NegativeCycle);
            }
            node = self.network.edge(index).from;
        }
        path.reverse();

        Ok(Some(path))
    }

    /// One relaxation round over all edges; returns whether any distance improved
    fn relax(&self, distances: &mut [Cost], predecessors: &mut [Option<EdgeIndex>]) -> bool {
        let mut relaxed = false;
        for from in 0..self.network.node_count() {
            if distances[from] == UNREACHED {
                continue;
            }
            for (index, edge) in self.network.edges_from(from) {
                if edge.remaining_capacity() > 0 && distances[from] + edge.cost < distances[edge.to]
                {
                    distances[edge.to] = distances[from] + edge.cost;
                    predecessors[edge.to] = Some(index);
                    relaxed = true;
                }
            }
        }
        relaxed
    }
}
