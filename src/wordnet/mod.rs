pub mod index;
pub mod parser;

pub use index::WordNet;
pub use parser::{parse_hypernyms, parse_synsets, HypernymRecord, SynsetRecord};
