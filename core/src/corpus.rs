use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tokenizer;

/// Immutable corpus snapshot: tale title -> normalized token sequence.
///
/// Backed by a `BTreeMap` so document iteration order (and with it score
/// tie-breaking and similarity-matrix layout) is deterministic across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    docs: BTreeMap<String, Vec<String>>,
}

impl Corpus {
    pub fn from_documents(docs: BTreeMap<String, Vec<String>>) -> Self {
        Self { docs }
    }

    /// Ingestion boundary: builds the corpus from the extraction stage's
    /// `title -> raw page texts` mapping.
    ///
    /// Tales that normalize to zero tokens are skipped rather than carried
    /// into scoring as empty rows.
    pub fn from_raw_book(book: &BTreeMap<String, Vec<String>>) -> Self {
        let mut docs = BTreeMap::new();
        for (title, pages) in book {
            let tokens = tokenizer::clean_pages(pages);
            if tokens.is_empty() {
                tracing::warn!(title = %title, "tale normalized to zero tokens, skipping");
                continue;
            }
            docs.insert(title.clone(), tokens);
        }
        Self { docs }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.docs.keys().map(String::as_str)
    }

    pub fn tokens(&self, title: &str) -> Option<&[String]> {
        self.docs.get(title).map(Vec::as_slice)
    }

    /// Documents in title order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> + '_ {
        self.docs.iter()
    }
}
