pub mod config;
pub mod error;
pub mod graph;
pub mod sap;
pub mod types;
pub mod wordnet;

pub use error::{Result, SapError};
pub use graph::{EdgeList, HypernymGraph};
pub use sap::Sap;
pub use wordnet::WordNet;
