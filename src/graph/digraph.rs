use crate::error::{Result, SapError};
use crate::graph::store::EdgeList;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parse a digraph description: the vertex count, the edge count, then one
/// `v w` pair per edge. Tokens are whitespace-separated and may span lines.
pub fn parse_digraph(content: &str) -> Result<EdgeList> {
    let mut tokens = content
        .lines()
        .enumerate()
        .flat_map(|(index, line)| line.split_whitespace().map(move |token| (index + 1, token)));

    let mut next_number = |what: &str| -> Result<usize> {
        let (line, token) = tokens
            .next()
            .ok_or_else(|| SapError::parse(content.lines().count(), format!("missing {}", what)))?;
        token
            .parse::<usize>()
            .map_err(|_| SapError::parse(line, format!("invalid {} '{}'", what, token)))
    };

    let vertex_count = next_number("vertex count")?;
    let edge_count = next_number("edge count")?;

    let mut edges = EdgeList::new(vertex_count);
    for _ in 0..edge_count {
        let from = next_number("edge source")?;
        let to = next_number("edge target")?;
        edges.add_edge(from, to);
    }

    debug!("Parsed digraph with {} vertices and {} edges", vertex_count, edge_count);
    Ok(edges)
}

/// Read and parse a digraph file
pub fn read_digraph<P: AsRef<Path>>(path: P) -> Result<EdgeList> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_digraph(&content)
}
