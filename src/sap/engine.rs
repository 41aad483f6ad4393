use crate::error::{Result, SapError};
use crate::graph::{BreadthFirstPaths, HypernymGraph};
use crate::types::{AncestralPath, AncestralTrace};
use std::sync::Arc;
use tracing::debug;

/// Shortest ancestral path engine over a shared, immutable hypernym graph.
///
/// Holds no per-query state: each call runs its own pair of searches, so one
/// instance can serve many threads at once.
#[derive(Debug, Clone)]
pub struct Sap {
    graph: Arc<HypernymGraph>,
}

impl Sap {
    pub fn new(graph: Arc<HypernymGraph>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &HypernymGraph {
        &self.graph
    }

    /// Length of the shortest ancestral path between `v` and `w`
    pub fn length(&self, v: usize, w: usize) -> Result<Option<usize>> {
        Ok(self.solve_pair(v, w)?.map(|path| path.length))
    }

    /// A common ancestor of `v` and `w` on a shortest ancestral path
    pub fn ancestor(&self, v: usize, w: usize) -> Result<Option<usize>> {
        Ok(self.solve_pair(v, w)?.map(|path| path.ancestor))
    }

    /// Length of the shortest ancestral path between any vertex of `a` and any vertex of `b`
    pub fn length_of_sets<A, B>(&self, a: A, b: B) -> Result<Option<usize>>
    where
        A: IntoIterator<Item = usize>,
        B: IntoIterator<Item = usize>,
    {
        Ok(self.solve(a, b)?.map(|path| path.length))
    }

    /// A common ancestor on a shortest ancestral path between the two sets
    pub fn ancestor_of_sets<A, B>(&self, a: A, b: B) -> Result<Option<usize>>
    where
        A: IntoIterator<Item = usize>,
        B: IntoIterator<Item = usize>,
    {
        Ok(self.solve(a, b)?.map(|path| path.ancestor))
    }

    /// Ancestor and length in one pass. Among equally short paths the
    /// ancestor with the lowest vertex id wins.
    pub fn solve<A, B>(&self, a: A, b: B) -> Result<Option<AncestralPath>>
    where
        A: IntoIterator<Item = usize>,
        B: IntoIterator<Item = usize>,
    {
        let sources_a = self.validate(a)?;
        let sources_b = self.validate(b)?;
        let (bfs_a, bfs_b) = self.search(&sources_a, &sources_b);
        Ok(self.closest_common(&bfs_a, &bfs_b))
    }

    /// Like [`Sap::solve`], also returning both paths up to the ancestor
    pub fn trace<A, B>(&self, a: A, b: B) -> Result<Option<AncestralTrace>>
    where
        A: IntoIterator<Item = usize>,
        B: IntoIterator<Item = usize>,
    {
        let sources_a = self.validate(a)?;
        let sources_b = self.validate(b)?;
        let (bfs_a, bfs_b) = self.search(&sources_a, &sources_b);

        let Some(best) = self.closest_common(&bfs_a, &bfs_b) else {
            return Ok(None);
        };

        match (bfs_a.path_to(best.ancestor), bfs_b.path_to(best.ancestor)) {
            (Some(path_a), Some(path_b)) => Ok(Some(AncestralTrace {
                ancestor: best.ancestor,
                length: best.length,
                path_a,
                path_b,
            })),
            _ => Ok(None),
        }
    }

    fn solve_pair(&self, v: usize, w: usize) -> Result<Option<AncestralPath>> {
        if v == w {
            self.check_vertex(v)?;
            return Ok(Some(AncestralPath {
                ancestor: v,
                length: 0,
            }));
        }
        self.solve([v], [w])
    }

    fn search(&self, sources_a: &[usize], sources_b: &[usize]) -> (BreadthFirstPaths, BreadthFirstPaths) {
        let bfs_a = BreadthFirstPaths::new(&self.graph, sources_a.iter().copied());
        let bfs_b = BreadthFirstPaths::new(&self.graph, sources_b.iter().copied());
        debug!(
            "Ancestral search from {} and {} sources reached {} and {} vertices",
            sources_a.len(),
            sources_b.len(),
            bfs_a.reached_count(),
            bfs_b.reached_count()
        );
        (bfs_a, bfs_b)
    }

    /// Scan vertices in increasing id order for the smallest summed distance
    fn closest_common(&self, bfs_a: &BreadthFirstPaths, bfs_b: &BreadthFirstPaths) -> Option<AncestralPath> {
        let mut best: Option<AncestralPath> = None;

        for vertex in 0..self.graph.vertex_count() {
            if let (Some(da), Some(db)) = (bfs_a.dist_to(vertex), bfs_b.dist_to(vertex)) {
                let length = da + db;
                if best.map_or(true, |current| length < current.length) {
                    best = Some(AncestralPath {
                        ancestor: vertex,
                        length,
                    });
                }
            }
        }

        best
    }

    fn validate<I>(&self, sources: I) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = usize>,
    {
        sources
            .into_iter()
            .map(|v| self.check_vertex(v).map(|_| v))
            .collect()
    }

    fn check_vertex(&self, v: usize) -> Result<()> {
        if self.graph.contains(v) {
            Ok(())
        } else {
            Err(SapError::invalid_argument(format!(
                "vertex {} is not in 0..{}",
                v,
                self.graph.vertex_count()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeList;
    use proptest::prelude::*;

    fn engine(vertex_count: usize, edges: &[(usize, usize)]) -> Sap {
        let graph = HypernymGraph::new(&EdgeList {
            vertex_count,
            edges: edges.to_vec(),
        })
        .unwrap();
        Sap::new(Arc::new(graph))
    }

    /// The 13-vertex sample digraph from the classic assignment
    fn digraph1() -> Sap {
        engine(
            13,
            &[
                (7, 3),
                (8, 3),
                (3, 1),
                (4, 1),
                (5, 1),
                (9, 5),
                (10, 5),
                (11, 10),
                (12, 10),
                (1, 0),
                (2, 0),
                (6, 2),
            ],
        )
    }

    #[test]
    fn test_two_children_of_root() {
        let sap = engine(3, &[(1, 0), (2, 0)]);

        assert_eq!(sap.ancestor(1, 2).unwrap(), Some(0));
        assert_eq!(sap.length(1, 2).unwrap(), Some(2));
    }

    #[test]
    fn test_chain() {
        let sap = engine(3, &[(1, 0), (2, 1)]);

        assert_eq!(sap.ancestor(1, 2).unwrap(), Some(1));
        assert_eq!(sap.length(1, 2).unwrap(), Some(1));
    }

    #[test]
    fn test_sample_digraph_queries() {
        let sap = digraph1();

        assert_eq!(sap.length(3, 11).unwrap(), Some(4));
        assert_eq!(sap.ancestor(3, 11).unwrap(), Some(1));
        assert_eq!(sap.length(9, 12).unwrap(), Some(3));
        assert_eq!(sap.ancestor(9, 12).unwrap(), Some(5));
        assert_eq!(sap.length(7, 2).unwrap(), Some(4));
        assert_eq!(sap.ancestor(7, 2).unwrap(), Some(0));
    }

    #[test]
    fn test_same_vertex() {
        let sap = digraph1();

        assert_eq!(sap.ancestor(6, 6).unwrap(), Some(6));
        assert_eq!(sap.length(6, 6).unwrap(), Some(0));
    }

    #[test]
    fn test_set_queries() {
        let sap = digraph1();

        assert_eq!(sap.length_of_sets([7, 8], [12, 2]).unwrap(), Some(4));
        assert_eq!(sap.ancestor_of_sets([7, 8], [12, 2]).unwrap(), Some(0));
        assert_eq!(sap.ancestor_of_sets(vec![3, 11], vec![9, 12]).unwrap(), Some(10));
        assert_eq!(sap.length_of_sets(vec![3, 11], vec![9, 12]).unwrap(), Some(2));
    }

    #[test]
    fn test_shared_vertex_gives_zero() {
        let sap = digraph1();
        let path = sap.solve([7, 4], [9, 4, 4]).unwrap();

        assert_eq!(path, Some(AncestralPath { ancestor: 4, length: 0 }));
    }

    #[test]
    fn test_set_ancestor_need_not_be_reached_by_every_source() {
        let sap = engine(3, &[(1, 0), (2, 0)]);
        let path = sap.solve([1, 2], [1]).unwrap();

        assert_eq!(path, Some(AncestralPath { ancestor: 1, length: 0 }));
        // 2 is a source of the first set yet never reaches vertex 1
        assert!(!BreadthFirstPaths::new(sap.graph(), [2]).has_path_to(1));
    }

    #[test]
    fn test_singleton_sets_match_vertex_queries() {
        let sap = digraph1();

        for v in 0..13 {
            for w in 0..13 {
                assert_eq!(sap.length(v, w).unwrap(), sap.length_of_sets([v], [w]).unwrap());
                assert_eq!(sap.ancestor(v, w).unwrap(), sap.ancestor_of_sets([v], [w]).unwrap());
            }
        }
    }

    #[test]
    fn test_empty_set_has_no_ancestor() {
        let sap = digraph1();

        assert_eq!(sap.ancestor_of_sets(Vec::<usize>::new(), vec![3]).unwrap(), None);
        assert_eq!(sap.length_of_sets(vec![3], Vec::<usize>::new()).unwrap(), None);
        assert_eq!(sap.trace(Vec::<usize>::new(), Vec::<usize>::new()).unwrap(), None);
    }

    #[test]
    fn test_out_of_range_vertex_is_rejected() {
        let sap = digraph1();

        assert!(matches!(sap.length(13, 1), Err(SapError::InvalidArgument(_))));
        assert!(matches!(sap.ancestor(1, 99), Err(SapError::InvalidArgument(_))));
        assert!(matches!(sap.ancestor(40, 40), Err(SapError::InvalidArgument(_))));
        assert!(matches!(
            sap.length_of_sets(vec![1, 2], vec![3, 13]),
            Err(SapError::InvalidArgument(_))
        ));
        // An empty partner set does not excuse a bad id
        assert!(matches!(
            sap.ancestor_of_sets(vec![100], Vec::<usize>::new()),
            Err(SapError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_ties_resolve_to_lowest_id() {
        // 3 -> 1, 3 -> 2, 4 -> 1, 4 -> 2: both 1 and 2 give length 2
        let sap = engine(5, &[(1, 0), (2, 0), (3, 2), (3, 1), (4, 2), (4, 1)]);

        assert_eq!(sap.solve([3], [4]).unwrap(), Some(AncestralPath { ancestor: 1, length: 2 }));
        assert_eq!(sap.ancestor(4, 3).unwrap(), Some(1));
    }

    #[test]
    fn test_sum_beats_nearest_ancestor_of_one_side() {
        // 1 reaches 0 directly; 2 -> 3 -> 4 -> 0 and 2 -> 1. Best is 1 with length 1.
        let sap = engine(5, &[(1, 0), (2, 3), (3, 4), (4, 0), (2, 1)]);

        assert_eq!(sap.solve([1], [2]).unwrap(), Some(AncestralPath { ancestor: 1, length: 1 }));
    }

    #[test]
    fn test_trace_paths() {
        let sap = digraph1();
        let trace = sap.trace([3], [11]).unwrap().unwrap();

        assert_eq!(trace.ancestor, 1);
        assert_eq!(trace.length, 4);
        assert_eq!(trace.path_a, vec![3, 1]);
        assert_eq!(trace.path_b, vec![11, 10, 5, 1]);
    }

    #[test]
    fn test_concurrent_queries_share_engine() {
        let sap = Arc::new(digraph1());

        let handles: Vec<_> = (0..4)
            .map(|offset| {
                let sap = Arc::clone(&sap);
                std::thread::spawn(move || {
                    (0..13)
                        .map(|v| sap.length(v, (v + offset) % 13).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for (offset, handle) in handles.into_iter().enumerate() {
            let lengths = handle.join().unwrap();
            for (v, length) in lengths.into_iter().enumerate() {
                assert_eq!(length, sap.length(v, (v + offset) % 13).unwrap());
            }
        }
    }

    /// Rooted DAG where vertex `i + 1` points at one or more lower ids
    fn rooted_dag() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        prop::collection::vec(prop::collection::vec(any::<usize>(), 1..4), 0..24).prop_map(|picks| {
            let vertex_count = picks.len() + 1;
            let mut edges = Vec::new();
            for (index, targets) in picks.into_iter().enumerate() {
                let from = index + 1;
                for target in targets {
                    edges.push((from, target % from));
                }
            }
            (vertex_count, edges)
        })
    }

    proptest! {
        #[test]
        fn prop_ancestral_path_is_common_and_minimal(
            (vertex_count, edges) in rooted_dag(),
            picks_a in prop::collection::vec(any::<usize>(), 0..4),
            picks_b in prop::collection::vec(any::<usize>(), 0..4),
        ) {
            let sap = engine(vertex_count, &edges);
            let a: Vec<usize> = picks_a.iter().map(|p| p % vertex_count).collect();
            let b: Vec<usize> = picks_b.iter().map(|p| p % vertex_count).collect();

            let result = sap.solve(a.clone(), b.clone()).unwrap();
            prop_assert_eq!(result.map(|p| p.length), sap.length_of_sets(a.clone(), b.clone()).unwrap());
            prop_assert_eq!(result.map(|p| p.ancestor), sap.ancestor_of_sets(a.clone(), b.clone()).unwrap());

            let dist_from = |sources: &[usize], x: usize| {
                sources
                    .iter()
                    .filter_map(|&s| BreadthFirstPaths::new(sap.graph(), [s]).dist_to(x))
                    .min()
            };
            let brute_best = (0..vertex_count)
                .filter_map(|x| {
                    Some(dist_from(&a, x)? + dist_from(&b, x)?)
                })
                .min();
            prop_assert_eq!(result.map(|p| p.length), brute_best);

            match result {
                Some(path) => {
                    // The ancestor is reached through the nearest source of each set
                    let summed = dist_from(&a, path.ancestor).zip(dist_from(&b, path.ancestor));
                    prop_assert_eq!(summed.map(|(da, db)| da + db), Some(path.length));

                    if a.len() == 1 && b.len() == 1 {
                        prop_assert!(BreadthFirstPaths::new(sap.graph(), [a[0]]).has_path_to(path.ancestor));
                        prop_assert!(BreadthFirstPaths::new(sap.graph(), [b[0]]).has_path_to(path.ancestor));
                    }
                }
                None => prop_assert!(a.is_empty() || b.is_empty()),
            }
        }

        #[test]
        fn prop_vertex_queries_are_symmetric(
            (vertex_count, edges) in rooted_dag(),
            v in any::<usize>(),
            w in any::<usize>(),
        ) {
            let sap = engine(vertex_count, &edges);
            let (v, w) = (v % vertex_count, w % vertex_count);

            prop_assert_eq!(sap.ancestor(v, v).unwrap(), Some(v));
            prop_assert_eq!(sap.length(v, v).unwrap(), Some(0));

            let forward = sap.solve([v], [w]).unwrap();
            let backward = sap.solve([w], [v]).unwrap();
            prop_assert_eq!(forward.map(|p| p.length), backward.map(|p| p.length));

            // The ancestor chosen one way is optimal the other way too
            if let Some(path) = forward {
                let from_w = BreadthFirstPaths::new(sap.graph(), [w]).dist_to(path.ancestor);
                let from_v = BreadthFirstPaths::new(sap.graph(), [v]).dist_to(path.ancestor);
                prop_assert_eq!(from_v.zip(from_w).map(|(x, y)| x + y), Some(path.length));
            }
        }
    }
}
