use std::collections::{BTreeMap, HashMap};

use crate::{Corpus, Error, Vocabulary};

/// Substituted for an IDF of exactly 0.0 (a term present in every document)
/// so the term's TF-IDF products are not zeroed out downstream.
pub const IDF_EPSILON: f64 = 1e-7;

/// Normalized frequency of `term` in a token sequence: count / length,
/// in [0, 1]. Zero when the term never occurs.
pub fn term_frequency(term: &str, tokens: &[String]) -> Result<f64, Error> {
    if tokens.is_empty() {
        return Err(Error::EmptyDocument);
    }
    let count = tokens.iter().filter(|t| t.as_str() == term).count();
    Ok(count as f64 / tokens.len() as f64)
}

/// Number of documents in `corpus` containing `term` at least once.
pub fn document_frequency(term: &str, corpus: &Corpus) -> usize {
    corpus
        .iter()
        .filter(|(_, tokens)| tokens.iter().any(|t| t == term))
        .count()
}

/// Smoothed inverse document frequency: `ln((n + 1) / (df + 1))`.
///
/// The +1 on both sides keeps the value non-negative and the division
/// defined for df = 0. An exact 0.0 becomes [`IDF_EPSILON`].
pub fn idf_weight(df: usize, num_docs: usize) -> f64 {
    let idf = ((num_docs as f64 + 1.0) / (df as f64 + 1.0)).ln();
    if idf == 0.0 {
        IDF_EPSILON
    } else {
        idf
    }
}

/// TF-IDF weight tables for one corpus snapshot.
///
/// Holds the shared IDF table and one weight row per document. A row stores
/// only the terms occurring in that document; absent entries read as 0.0,
/// making the table the logically dense documents x vocabulary matrix.
#[derive(Debug, Clone)]
pub struct TfIdfModel {
    num_docs: usize,
    vocab: Vocabulary,
    idf: HashMap<String, f64>,
    doc_weights: BTreeMap<String, HashMap<String, f64>>,
}

impl TfIdfModel {
    /// Computes DF, IDF, and per-document TF-IDF weights for every
    /// vocabulary term.
    ///
    /// The vocabulary must have been derived from `corpus`: a term with a
    /// document frequency of 0 fails with
    /// [`Error::InconsistentVocabulary`] instead of being coerced.
    pub fn fit(corpus: &Corpus, vocab: Vocabulary) -> Result<Self, Error> {
        if corpus.is_empty() || vocab.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let num_docs = corpus.len();

        let mut idf = HashMap::with_capacity(vocab.len());
        for term in vocab.terms() {
            let df = document_frequency(term, corpus);
            if df == 0 {
                return Err(Error::InconsistentVocabulary(term.clone()));
            }
            idf.insert(term.clone(), idf_weight(df, num_docs));
        }

        let mut doc_weights = BTreeMap::new();
        for (title, tokens) in corpus.iter() {
            if tokens.is_empty() {
                return Err(Error::EmptyDocument);
            }
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for token in tokens {
                *counts.entry(token.as_str()).or_insert(0) += 1;
            }
            let mut row = HashMap::with_capacity(counts.len());
            for (term, count) in counts {
                let tf = count as f64 / tokens.len() as f64;
                row.insert(term.to_owned(), tf * idf[term]);
            }
            doc_weights.insert(title.clone(), row);
        }
        tracing::debug!(docs = num_docs, terms = vocab.len(), "tf-idf model fitted");

        Ok(Self {
            num_docs,
            vocab,
            idf,
            doc_weights,
        })
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Corpus-wide IDF of `term`, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// TF-IDF weight of `term` in the document titled `title`; 0.0 when the
    /// term does not occur there.
    pub fn weight(&self, title: &str, term: &str) -> f64 {
        self.doc_weights
            .get(title)
            .and_then(|row| row.get(term).copied())
            .unwrap_or(0.0)
    }

    /// Per-document weight rows in title order.
    pub fn doc_weights(&self) -> &BTreeMap<String, HashMap<String, f64>> {
        &self.doc_weights
    }

    /// TF-IDF weights for a query, using the query's own term frequencies
    /// against the corpus-derived IDF table.
    ///
    /// A query contributes no documents, so IDF is never recomputed. Tokens
    /// outside the vocabulary are skipped silently.
    pub fn query_weights(&self, tokens: &[String]) -> Result<HashMap<String, f64>, Error> {
        if tokens.is_empty() {
            return Err(Error::EmptyQuery);
        }
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
        let mut weights = HashMap::new();
        for (term, count) in counts {
            if let Some(idf) = self.idf.get(term) {
                let tf = count as f64 / tokens.len() as f64;
                weights.insert(term.to_owned(), tf * idf);
            }
        }
        Ok(weights)
    }
}
