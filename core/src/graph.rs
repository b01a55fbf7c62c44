//! Lead-adjacency graph construction
//!
//! The classifier sees the 12 leads as graph nodes. Topology is fixed: every
//! lead is connected to every other lead in both directions, so the edge set
//! is computed once per process and shared.

use crate::types::{SignalMatrix, LEAD_COUNT, SAMPLES_PER_LEAD};
use std::sync::OnceLock;

/// Number of directed edges in the fully connected lead graph
pub const EDGE_COUNT: usize = LEAD_COUNT * (LEAD_COUNT - 1);

/// Directed edge set over the 12 lead nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadGraph {
    edges: Vec<(usize, usize)>,
}

impl LeadGraph {
    /// The shared fully connected graph: every `(i, j)` with `i != j`
    ///
    /// Edges are ordered source-major: (0,1), (0,2), ..., (11,10).
    pub fn fully_connected() -> &'static LeadGraph {
        static GRAPH: OnceLock<LeadGraph> = OnceLock::new();
        GRAPH.get_or_init(|| {
            let edges = (0..LEAD_COUNT)
                .flat_map(|i| (0..LEAD_COUNT).filter(move |&j| j != i).map(move |j| (i, j)))
                .collect();
            LeadGraph { edges }
        })
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edge list as two rows (sources, targets), the usual COO layout
    pub fn to_coo(&self) -> [Vec<usize>; 2] {
        let sources = self.edges.iter().map(|&(s, _)| s).collect();
        let targets = self.edges.iter().map(|&(_, t)| t).collect();
        [sources, targets]
    }

    /// Source nodes of all edges ending at `node`
    pub fn in_neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .filter(move |&&(_, t)| t == node)
            .map(|&(s, _)| s)
    }
}

/// Per-lead node features in (lead, time) order
#[derive(Debug, Clone, PartialEq)]
pub struct NodeFeatures {
    data: Vec<f32>,
}

impl NodeFeatures {
    /// Number of nodes (leads)
    pub fn num_nodes(&self) -> usize {
        LEAD_COUNT
    }

    /// Feature length per node (samples)
    pub fn feature_len(&self) -> usize {
        SAMPLES_PER_LEAD
    }

    /// Features of one node
    pub fn node(&self, index: usize) -> &[f32] {
        let start = index * SAMPLES_PER_LEAD;
        &self.data[start..start + SAMPLES_PER_LEAD]
    }

    /// Contiguous row-major buffer of shape (12, 1000)
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Builds classifier inputs from a digitized signal matrix
pub struct GraphBuilder;

impl GraphBuilder {
    /// Returns node features and the shared lead graph
    pub fn build(signals: &SignalMatrix) -> (NodeFeatures, &'static LeadGraph) {
        let mut data = Vec::with_capacity(LEAD_COUNT * SAMPLES_PER_LEAD);
        for signal in signals.leads() {
            data.extend_from_slice(signal.samples());
        }
        (NodeFeatures { data }, LeadGraph::fully_connected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WaveformSignal;
    use std::collections::HashSet;

    fn matrix_with(f: impl Fn(usize, usize) -> f32) -> SignalMatrix {
        SignalMatrix::new(std::array::from_fn(|lead| {
            WaveformSignal::new((0..SAMPLES_PER_LEAD).map(|t| f(lead, t)).collect()).unwrap()
        }))
    }

    #[test]
    fn test_graph_has_132_edges_without_self_loops() {
        let graph = LeadGraph::fully_connected();
        assert_eq!(graph.edge_count(), 132);
        assert_eq!(EDGE_COUNT, 132);
        assert!(graph.edges().iter().all(|&(i, j)| i != j));

        let unique: HashSet<_> = graph.edges().iter().collect();
        assert_eq!(unique.len(), 132);
    }

    #[test]
    fn test_graph_edge_order() {
        let graph = LeadGraph::fully_connected();
        assert_eq!(graph.edges()[0], (0, 1));
        assert_eq!(graph.edges()[10], (0, 11));
        assert_eq!(graph.edges()[11], (1, 0));
        assert_eq!(graph.edges()[131], (11, 10));
    }

    #[test]
    fn test_graph_independent_of_signal() {
        let (_, a) = GraphBuilder::build(&matrix_with(|_, _| 0.0));
        let (_, b) = GraphBuilder::build(&matrix_with(|l, t| (l * t) as f32));
        assert_eq!(a, b);
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_in_neighbors() {
        let graph = LeadGraph::fully_connected();
        let neighbors: Vec<_> = graph.in_neighbors(3).collect();
        assert_eq!(neighbors.len(), 11);
        assert!(!neighbors.contains(&3));
    }

    #[test]
    fn test_to_coo() {
        let [sources, targets] = LeadGraph::fully_connected().to_coo();
        assert_eq!(sources.len(), 132);
        assert_eq!(targets.len(), 132);
        assert_eq!((sources[11], targets[11]), (1, 0));
    }

    #[test]
    fn test_node_features_lead_major() {
        let (features, _) = GraphBuilder::build(&matrix_with(|l, t| (l * 10_000 + t) as f32));
        assert_eq!(features.num_nodes(), 12);
        assert_eq!(features.feature_len(), 1000);
        assert_eq!(features.as_slice().len(), 12_000);
        assert_eq!(features.node(0)[0], 0.0);
        assert_eq!(features.node(4)[7], 40_007.0);
        assert_eq!(features.as_slice()[4 * 1000 + 7], 40_007.0);
    }
}
