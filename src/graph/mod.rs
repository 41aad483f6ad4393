pub mod digraph;
pub mod store;
pub mod traversal;

pub use digraph::{parse_digraph, read_digraph};
pub use store::{EdgeList, HypernymGraph};
pub use traversal::BreadthFirstPaths;
