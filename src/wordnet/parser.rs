use crate::error::{Result, SapError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One synset line: `id,noun1 noun2 ...,gloss`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynsetRecord {
    pub id: usize,
    /// The synset field exactly as it appeared in the input
    pub label: String,
    pub nouns: Vec<String>,
}

impl SynsetRecord {
    pub fn new(id: usize, label: impl Into<String>) -> Self {
        let label = label.into();
        let nouns = label.split(' ').filter(|n| !n.is_empty()).map(str::to_string).collect();
        Self { id, label, nouns }
    }
}

/// One hypernym line: `id,h1,h2,...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypernymRecord {
    pub id: usize,
    pub hypernyms: Vec<usize>,
}

/// Parse the synsets table. The gloss may itself contain commas and is dropped.
pub fn parse_synsets(content: &str) -> Result<Vec<SynsetRecord>> {
    let mut records = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.splitn(3, ',');
        let id = parse_id(fields.next(), line_number, "synset id")?;
        let label = fields
            .next()
            .filter(|label| !label.trim().is_empty())
            .ok_or_else(|| SapError::parse(line_number, "missing synset nouns"))?;

        records.push(SynsetRecord::new(id, label));
    }

    debug!("Parsed {} synset records", records.len());
    Ok(records)
}

/// Parse the hypernyms table. A line holding only an id declares no hypernyms.
pub fn parse_hypernyms(content: &str) -> Result<Vec<HypernymRecord>> {
    let mut records = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split(',');
        let id = parse_id(fields.next(), line_number, "synset id")?;
        let hypernyms = fields
            .filter(|field| !field.trim().is_empty())
            .map(|field| parse_id(Some(field), line_number, "hypernym id"))
            .collect::<Result<Vec<_>>>()?;

        records.push(HypernymRecord { id, hypernyms });
    }

    debug!("Parsed {} hypernym records", records.len());
    Ok(records)
}

fn parse_id(field: Option<&str>, line: usize, what: &str) -> Result<usize> {
    let field = field.map(str::trim).unwrap_or_default();
    field
        .parse::<usize>()
        .map_err(|_| SapError::parse(line, format!("invalid {} '{}'", what, field)))
}
