use std::collections::HashMap;

use crate::{Error, TfIdfModel, Vocabulary};

/// Expands a sparse term -> weight mapping into a dense vector aligned to
/// the vocabulary index. Terms absent from `weights` stay 0.0.
///
/// Document and query vectors must both go through this function so their
/// positions line up.
pub fn vectorize(weights: &HashMap<String, f64>, vocab: &Vocabulary) -> Vec<f64> {
    let mut vector = vec![0.0; vocab.len()];
    for (term, weight) in weights {
        if let Some(i) = vocab.index_of(term) {
            vector[i] = *weight;
        }
    }
    vector
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Cosine similarity between two index-aligned vectors:
/// `dot(a, b) / (|a| * |b|)`.
///
/// A zero-norm operand fails with [`Error::ZeroVector`] rather than
/// producing NaN.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, Error> {
    let (norm_a, norm_b) = (norm(a), norm(b));
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(Error::ZeroVector);
    }
    Ok(dot(a, b) / (norm_a * norm_b))
}

/// Pairwise document-document cosine similarity matrix, rows and columns in
/// corpus (title) order.
pub fn similarity_matrix(model: &TfIdfModel) -> Result<(Vec<String>, Vec<Vec<f64>>), Error> {
    let titles: Vec<String> = model.doc_weights().keys().cloned().collect();
    let vectors: Vec<Vec<f64>> = model
        .doc_weights()
        .values()
        .map(|row| vectorize(row, model.vocab()))
        .collect();

    let mut matrix = vec![vec![0.0; vectors.len()]; vectors.len()];
    for i in 0..vectors.len() {
        for j in i..vectors.len() {
            let sim = cosine_similarity(&vectors[i], &vectors[j])?;
            matrix[i][j] = sim;
            matrix[j][i] = sim;
        }
    }
    Ok((titles, matrix))
}
