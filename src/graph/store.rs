use crate::error::{Result, SapError};
use crate::types::GraphStatistics;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Raw graph description handed over by the parsers: `vertex_count` vertices
/// numbered `0..vertex_count` and directed `(from, to)` hypernym edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeList {
    pub vertex_count: usize,
    pub edges: Vec<(usize, usize)>,
}

impl EdgeList {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
        }
    }

    pub fn add_edge(&mut self, from: usize, to: usize) {
        self.edges.push((from, to));
    }
}

const MAX_INDEX_COUNT: usize = u32::MAX as usize;

/// Immutable rooted DAG of hypernym relations.
///
/// Node indices of the inner petgraph graph are exactly the vertex ids, since
/// nodes are only ever added in order and never removed. Edges point from a
/// vertex toward its more general concepts.
#[derive(Debug, Clone)]
pub struct HypernymGraph {
    graph: DiGraph<(), ()>,
    root: usize,
}

impl HypernymGraph {
    /// Build and validate the graph. The adjacency is copied out of `input`,
    /// so later changes to the edge list are never observed.
    pub fn new(input: &EdgeList) -> Result<Self> {
        let vertex_count = input.vertex_count;
        // petgraph's default u32 indices reserve u32::MAX as the end marker
        if vertex_count > MAX_INDEX_COUNT || input.edges.len() > MAX_INDEX_COUNT {
            return Err(SapError::invalid_argument(format!(
                "graph with {} vertices and {} edges exceeds the supported size of {}",
                vertex_count,
                input.edges.len(),
                MAX_INDEX_COUNT
            )));
        }

        let mut graph = DiGraph::with_capacity(vertex_count, input.edges.len());
        for _ in 0..vertex_count {
            graph.add_node(());
        }

        let mut seen_edges = HashSet::with_capacity(input.edges.len());
        for &(from, to) in &input.edges {
            if from >= vertex_count || to >= vertex_count {
                return Err(SapError::invalid_argument(format!(
                    "edge {} -> {} is outside the vertex range 0..{}",
                    from, to, vertex_count
                )));
            }
            if from == to {
                return Err(SapError::invalid_graph(format!(
                    "self-loop on vertex {}",
                    from
                )));
            }
            if !seen_edges.insert((from, to)) {
                warn!("Parallel edge {} -> {} in hypernym graph", from, to);
            }
            graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
        }

        if let Err(cycle) = toposort(&graph, None) {
            return Err(SapError::invalid_graph(format!(
                "cycle detected through vertex {}",
                cycle.node_id().index()
            )));
        }

        let roots: Vec<usize> = graph
            .node_indices()
            .filter(|&node| {
                graph
                    .neighbors_directed(node, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|node| node.index())
            .collect();

        if roots.len() != 1 {
            return Err(SapError::invalid_graph(format!(
                "expected exactly one root, found {}",
                roots.len()
            )));
        }

        let root = roots[0];
        info!(
            "Hypernym graph built with {} vertices, {} edges, root {}",
            graph.node_count(),
            graph.edge_count(),
            root
        );

        Ok(Self { graph, root })
    }

    /// Get the number of vertices in the graph
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The unique vertex without outgoing edges
    pub fn root(&self) -> usize {
        self.root
    }

    pub fn contains(&self, v: usize) -> bool {
        v < self.vertex_count()
    }

    /// Direct hypernyms of `v`. Out-of-range ids have no neighbors.
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        let node = self.contains(v).then(|| NodeIndex::new(v));
        node.into_iter().flat_map(move |node| {
            self.graph
                .neighbors_directed(node, Direction::Outgoing)
                .map(|n| n.index())
        })
    }

    /// Direct hyponyms of `v`
    pub fn hyponyms(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        let node = self.contains(v).then(|| NodeIndex::new(v));
        node.into_iter().flat_map(move |node| {
            self.graph
                .neighbors_directed(node, Direction::Incoming)
                .map(|n| n.index())
        })
    }

    pub fn out_degree(&self, v: usize) -> usize {
        self.neighbors(v).count()
    }

    pub fn in_degree(&self, v: usize) -> usize {
        self.hyponyms(v).count()
    }

    /// Get graph statistics
    pub fn statistics(&self) -> GraphStatistics {
        let total_vertices = self.vertex_count();
        let total_edges = self.edge_count();

        let mut leaf_vertices = 0;
        let mut max_out_degree = 0;
        for v in 0..total_vertices {
            if self.in_degree(v) == 0 {
                leaf_vertices += 1;
            }
            max_out_degree = max_out_degree.max(self.out_degree(v));
        }

        // Every edge contributes one in-degree and one out-degree
        let average_degree = if total_vertices > 0 {
            (2 * total_edges) as f64 / total_vertices as f64
        } else {
            0.0
        };

        debug!("Computed statistics for {} vertices", total_vertices);

        GraphStatistics {
            total_vertices,
            total_edges,
            root: self.root,
            leaf_vertices,
            max_out_degree,
            average_degree,
        }
    }
}
