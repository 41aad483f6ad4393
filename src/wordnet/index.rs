use crate::error::{Result, SapError};
use crate::graph::{EdgeList, HypernymGraph};
use crate::sap::Sap;
use crate::types::NounQueryReport;
use crate::wordnet::parser::{parse_hypernyms, parse_synsets, HypernymRecord, SynsetRecord};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Noun-level view over the hypernym graph.
///
/// Each synset is one vertex; a noun may belong to several synsets. All
/// path questions are answered by the inner [`Sap`] engine.
#[derive(Debug, Clone)]
pub struct WordNet {
    synsets: Vec<String>,
    noun_to_ids: HashMap<String, Vec<usize>>,
    sap: Sap,
}

impl WordNet {
    pub fn new(synsets: Vec<SynsetRecord>, hypernyms: Vec<HypernymRecord>) -> Result<Self> {
        let vertex_count = synsets.len();
        let mut labels: Vec<Option<String>> = vec![None; vertex_count];
        let mut noun_to_ids: HashMap<String, Vec<usize>> = HashMap::new();

        for record in synsets {
            if record.id >= vertex_count {
                return Err(SapError::invalid_argument(format!(
                    "synset id {} is outside 0..{}",
                    record.id, vertex_count
                )));
            }
            if labels[record.id].is_some() {
                return Err(SapError::invalid_argument(format!(
                    "duplicate synset id {}",
                    record.id
                )));
            }

            for noun in record.nouns {
                let ids = noun_to_ids.entry(noun).or_default();
                if !ids.contains(&record.id) {
                    ids.push(record.id);
                }
            }
            labels[record.id] = Some(record.label);
        }

        let mut edges = EdgeList::new(vertex_count);
        for record in hypernyms {
            if record.id >= vertex_count {
                return Err(SapError::invalid_argument(format!(
                    "hypernym record for unknown synset {}",
                    record.id
                )));
            }
            for hypernym in record.hypernyms {
                edges.add_edge(record.id, hypernym);
            }
        }

        let graph = HypernymGraph::new(&edges)?;
        info!(
            "WordNet index built with {} synsets and {} distinct nouns",
            vertex_count,
            noun_to_ids.len()
        );

        Ok(Self {
            synsets: labels.into_iter().map(Option::unwrap_or_default).collect(),
            noun_to_ids,
            sap: Sap::new(Arc::new(graph)),
        })
    }

    /// Read and parse the synsets and hypernyms files, then build the index
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(synsets_path: P, hypernyms_path: Q) -> Result<Self> {
        debug!("Loading synsets from: {:?}", synsets_path.as_ref());
        let synsets = parse_synsets(&fs::read_to_string(synsets_path.as_ref())?)?;

        debug!("Loading hypernyms from: {:?}", hypernyms_path.as_ref());
        let hypernyms = parse_hypernyms(&fs::read_to_string(hypernyms_path.as_ref())?)?;

        Self::new(synsets, hypernyms)
    }

    /// Every distinct noun, in no particular order
    pub fn nouns(&self) -> impl Iterator<Item = &str> + '_ {
        self.noun_to_ids.keys().map(String::as_str)
    }

    pub fn noun_count(&self) -> usize {
        self.noun_to_ids.len()
    }

    pub fn is_noun(&self, word: &str) -> bool {
        self.noun_to_ids.contains_key(word)
    }

    /// Synset ids containing `noun`
    pub fn synset_ids(&self, noun: &str) -> Option<&[usize]> {
        self.noun_to_ids.get(noun).map(Vec::as_slice)
    }

    /// The stored synset text for vertex `id`
    pub fn synset(&self, id: usize) -> Option<&str> {
        self.synsets.get(id).map(String::as_str)
    }

    pub fn graph(&self) -> &HypernymGraph {
        self.sap.graph()
    }

    pub fn engine(&self) -> &Sap {
        &self.sap
    }

    /// Length of the shortest ancestral path between any synsets of the two nouns
    pub fn distance(&self, noun_a: &str, noun_b: &str) -> Result<usize> {
        let (ids_a, ids_b) = self.lookup_pair(noun_a, noun_b)?;
        self.sap
            .length_of_sets(ids_a.iter().copied(), ids_b.iter().copied())?
            .ok_or_else(|| no_common_ancestor(noun_a, noun_b))
    }

    /// Synset text of a common ancestor on a shortest ancestral path
    pub fn sap(&self, noun_a: &str, noun_b: &str) -> Result<&str> {
        let (ids_a, ids_b) = self.lookup_pair(noun_a, noun_b)?;
        let ancestor = self
            .sap
            .ancestor_of_sets(ids_a.iter().copied(), ids_b.iter().copied())?
            .ok_or_else(|| no_common_ancestor(noun_a, noun_b))?;
        self.label(ancestor)
    }

    /// Distance and ancestor from a single pair of searches
    pub fn query(&self, noun_a: &str, noun_b: &str) -> Result<NounQueryReport> {
        let (ids_a, ids_b) = self.lookup_pair(noun_a, noun_b)?;
        let path = self
            .sap
            .solve(ids_a.iter().copied(), ids_b.iter().copied())?
            .ok_or_else(|| no_common_ancestor(noun_a, noun_b))?;

        Ok(NounQueryReport {
            noun_a: noun_a.to_string(),
            noun_b: noun_b.to_string(),
            distance: path.length,
            ancestor: self.label(path.ancestor)?.to_string(),
        })
    }

    fn lookup_pair(&self, noun_a: &str, noun_b: &str) -> Result<(&[usize], &[usize])> {
        Ok((self.lookup(noun_a)?, self.lookup(noun_b)?))
    }

    fn lookup(&self, noun: &str) -> Result<&[usize]> {
        self.synset_ids(noun)
            .ok_or_else(|| SapError::invalid_argument(format!("'{}' is not a WordNet noun", noun)))
    }

    fn label(&self, id: usize) -> Result<&str> {
        self.synset(id)
            .ok_or_else(|| SapError::invalid_argument(format!("no synset with id {}", id)))
    }
}

// Unreachable for a validated graph: every vertex reaches the single root.
fn no_common_ancestor(noun_a: &str, noun_b: &str) -> SapError {
    SapError::invalid_graph(format!("no common ancestor for '{}' and '{}'", noun_a, noun_b))
}
