use crate::{vector, Error, TfIdfModel};

/// Additive matching score per document, in corpus (title) order.
///
/// Each query token adds the document's TF-IDF weight for that token to the
/// document's running score; duplicated query tokens add once per
/// occurrence. Documents sharing no token with the query stay at 0.0.
pub fn matching_scores(model: &TfIdfModel, query_tokens: &[String]) -> Vec<(String, f64)> {
    model
        .doc_weights()
        .iter()
        .map(|(title, row)| {
            let score = query_tokens
                .iter()
                .map(|token| row.get(token).copied().unwrap_or(0.0))
                .sum();
            (title.clone(), score)
        })
        .collect()
}

/// Sorts scores descending and truncates to the top `k`.
///
/// `None` keeps every entry. The sort is stable, so equal scores preserve
/// input order and repeated calls produce identical output.
pub fn rank_scores(mut scores: Vec<(String, f64)>, k: Option<usize>) -> Vec<(String, f64)> {
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));
    if let Some(k) = k {
        scores.truncate(k);
    }
    scores
}

/// Ranks the corpus against `query_tokens` by additive matching score.
pub fn rank_by_matching(
    model: &TfIdfModel,
    query_tokens: &[String],
    k: Option<usize>,
) -> Result<Vec<(String, f64)>, Error> {
    if query_tokens.is_empty() {
        return Err(Error::EmptyQuery);
    }
    Ok(rank_scores(matching_scores(model, query_tokens), k))
}

/// Ranks the corpus against `query_tokens` by cosine similarity between the
/// query vector and each document vector.
///
/// Individual out-of-vocabulary tokens are ignored; a query with no
/// vocabulary overlap at all vectorizes to zero and fails with
/// [`Error::ZeroVector`].
pub fn rank_by_cosine(
    model: &TfIdfModel,
    query_tokens: &[String],
    k: Option<usize>,
) -> Result<Vec<(String, f64)>, Error> {
    let query_weights = model.query_weights(query_tokens)?;
    let query_vector = vector::vectorize(&query_weights, model.vocab());

    let mut scores = Vec::with_capacity(model.num_docs());
    for (title, row) in model.doc_weights() {
        let doc_vector = vector::vectorize(row, model.vocab());
        let sim = vector::cosine_similarity(&doc_vector, &query_vector)?;
        scores.push((title.clone(), sim));
    }
    Ok(rank_scores(scores, k))
}
