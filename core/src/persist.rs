use crate::Corpus;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Ranking output persisted for offline inspection.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreReport {
    pub query: String,
    pub method: String,
    pub created_at: String,
    pub num_docs: usize,
    pub type_count: usize,
    pub token_count: usize,
    pub results: Vec<RankedDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankedDoc {
    pub title: String,
    pub score: f64,
}

/// A corpus document on disk: either a normalized token list or a single
/// joined string of normalized text.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDoc {
    Tokens(Vec<String>),
    Joined(String),
}

/// Loads the extraction stage's output: tale title -> ordered page texts.
pub fn load_raw_book<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, Vec<String>>> {
    let mut f = File::open(path)?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let book = serde_json::from_str(&buf)?;
    Ok(book)
}

pub fn save_corpus<P: AsRef<Path>>(path: P, corpus: &Corpus) -> Result<()> {
    let mut f = File::create(path)?;
    let json = serde_json::to_string_pretty(corpus)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

/// Loads a corpus file, accepting documents stored either as token lists or
/// as one joined whitespace-separated string.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let mut f = File::open(path)?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let stored: BTreeMap<String, StoredDoc> = serde_json::from_str(&buf)?;

    let docs = stored
        .into_iter()
        .map(|(title, doc)| {
            let tokens = match doc {
                StoredDoc::Tokens(tokens) => tokens,
                StoredDoc::Joined(text) => {
                    text.split_whitespace().map(str::to_owned).collect()
                }
            };
            (title, tokens)
        })
        .collect();
    Ok(Corpus::from_documents(docs))
}

pub fn save_report<P: AsRef<Path>>(path: P, report: &ScoreReport) -> Result<()> {
    let mut f = File::create(path)?;
    let json = serde_json::to_string_pretty(report)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}
