use std::collections::{BTreeSet, HashMap};

use crate::{Corpus, Error};

/// Corpus vocabulary with a stable term -> vector-position assignment.
///
/// Terms are kept in sorted order and a term's index is its position in
/// that order, so rebuilding from the same corpus reproduces the same
/// vectors. Rebuilding invalidates any vectors keyed by an older index.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    type_count: usize,
    token_count: usize,
}

impl Vocabulary {
    /// Derives the vocabulary from a corpus.
    ///
    /// Fails with [`Error::EmptyCorpus`] when the corpus has no documents
    /// or every document is empty.
    pub fn build(corpus: &Corpus) -> Result<Self, Error> {
        let mut terms: BTreeSet<&str> = BTreeSet::new();
        let mut token_count = 0usize;
        for (_, tokens) in corpus.iter() {
            token_count += tokens.len();
            for token in tokens {
                terms.insert(token.as_str());
            }
        }
        if token_count == 0 {
            return Err(Error::EmptyCorpus);
        }

        let terms: Vec<String> = terms.into_iter().map(str::to_owned).collect();
        let index: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        let type_count = terms.len();
        tracing::debug!(types = type_count, tokens = token_count, "vocabulary built");

        Ok(Self {
            terms,
            index,
            type_count,
            token_count,
        })
    }

    pub fn len(&self) -> usize {
        self.type_count
    }

    pub fn is_empty(&self) -> bool {
        self.type_count == 0
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Vector position of `term`, if it is in the vocabulary.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Terms in index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of distinct terms.
    pub fn type_count(&self) -> usize {
        self.type_count
    }

    /// Total token occurrences across the corpus, duplicates counted.
    pub fn token_count(&self) -> usize {
        self.token_count
    }
}
