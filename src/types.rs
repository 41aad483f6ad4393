use serde::{Deserialize, Serialize};

/// Core result types shared by the engine, the noun index and the CLI

/// A common ancestor together with the summed distance from both source sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestralPath {
    pub ancestor: usize,
    pub length: usize,
}

/// Ancestral path with the two vertex paths leading to the ancestor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestralTrace {
    pub ancestor: usize,
    pub length: usize,
    /// Vertices from the nearest source in the first set up to the ancestor
    pub path_a: Vec<usize>,
    /// Vertices from the nearest source in the second set up to the ancestor
    pub path_b: Vec<usize>,
}

impl AncestralTrace {
    pub fn summary(&self) -> AncestralPath {
        AncestralPath {
            ancestor: self.ancestor,
            length: self.length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_vertices: usize,
    pub total_edges: usize,
    pub root: usize,
    pub leaf_vertices: usize,
    pub max_out_degree: usize,
    pub average_degree: f64,
}

/// Answer to a noun-level query, as printed by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NounQueryReport {
    pub noun_a: String,
    pub noun_b: String,
    pub distance: usize,
    pub ancestor: String,
}

/// Answer to a vertex-level query; `-1` marks a missing path like the classic harness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexQueryReport {
    pub v: usize,
    pub w: usize,
    pub length: i64,
    pub ancestor: i64,
}

impl VertexQueryReport {
    pub fn new(v: usize, w: usize, path: Option<AncestralPath>) -> Self {
        match path {
            Some(path) => Self {
                v,
                w,
                length: path.length as i64,
                ancestor: path.ancestor as i64,
            },
            None => Self {
                v,
                w,
                length: -1,
                ancestor: -1,
            },
        }
    }
}
