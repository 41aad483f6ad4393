use crate::graph::store::HypernymGraph;
use std::collections::VecDeque;

/// Multi-source breadth-first search along hypernym edges.
///
/// Every source starts at distance 0; each reachable vertex records the
/// distance to its nearest source and the vertex it was discovered from.
/// The scratch state belongs to this value alone, so concurrent searches
/// over one shared graph never interfere.
#[derive(Debug, Clone)]
pub struct BreadthFirstPaths {
    dist_to: Vec<Option<usize>>,
    edge_to: Vec<Option<usize>>,
}

impl BreadthFirstPaths {
    /// Callers validate `sources`; ids outside the graph are ignored here.
    pub fn new<I>(graph: &HypernymGraph, sources: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let vertex_count = graph.vertex_count();
        let mut dist_to = vec![None; vertex_count];
        let mut edge_to = vec![None; vertex_count];
        let mut queue = VecDeque::new();

        // Initialize queue with every source at distance 0
        for source in sources {
            if source < vertex_count && dist_to[source].is_none() {
                dist_to[source] = Some(0);
                queue.push_back(source);
            }
        }

        while let Some(current) = queue.pop_front() {
            let next_distance = dist_to[current].map_or(0, |d| d + 1);
            for neighbor in graph.neighbors(current) {
                if dist_to[neighbor].is_none() {
                    dist_to[neighbor] = Some(next_distance);
                    edge_to[neighbor] = Some(current);
                    queue.push_back(neighbor);
                }
            }
        }

        Self { dist_to, edge_to }
    }

    pub fn has_path_to(&self, v: usize) -> bool {
        self.dist_to(v).is_some()
    }

    /// Distance from the nearest source, `None` when unreachable
    pub fn dist_to(&self, v: usize) -> Option<usize> {
        self.dist_to.get(v).copied().flatten()
    }

    /// Vertices from the nearest source to `v`, both ends included
    pub fn path_to(&self, v: usize) -> Option<Vec<usize>> {
        self.dist_to(v)?;

        let mut path = vec![v];
        let mut current = v;
        while let Some(prev) = self.edge_to[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }

    /// Number of vertices reached, sources included
    pub fn reached_count(&self) -> usize {
        self.dist_to.iter().filter(|d| d.is_some()).count()
    }
}
