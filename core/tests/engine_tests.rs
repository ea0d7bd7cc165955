use std::collections::BTreeMap;

use talesearch_core::tfidf::{document_frequency, term_frequency};
use talesearch_core::tokenizer::preprocess_query;
use talesearch_core::{rank, vector, Corpus, Error, TfIdfModel, Vocabulary};

const TOL: f64 = 1e-9;

fn toks(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn tiny_corpus() -> Corpus {
    let mut docs = BTreeMap::new();
    docs.insert("1".to_string(), toks(&["hola", "como", "estas"]));
    docs.insert("2".to_string(), toks(&["hola", "y", "tu", "yo"]));
    docs.insert("3".to_string(), toks(&["bien", "como", "estas"]));
    Corpus::from_documents(docs)
}

fn tiny_model() -> TfIdfModel {
    let corpus = tiny_corpus();
    let vocab = Vocabulary::build(&corpus).unwrap();
    TfIdfModel::fit(&corpus, vocab).unwrap()
}

#[test]
fn vocabulary_covers_every_corpus_term_once() {
    let corpus = tiny_corpus();
    let vocab = Vocabulary::build(&corpus).unwrap();

    assert_eq!(vocab.type_count(), 7);
    assert_eq!(vocab.token_count(), 10);
    for expected in ["hola", "como", "estas", "y", "tu", "yo", "bien"] {
        assert!(vocab.contains(expected));
    }
    // index assignment is injective and covers 0..type_count
    let mut positions: Vec<usize> = vocab
        .terms()
        .iter()
        .map(|t| vocab.index_of(t).unwrap())
        .collect();
    positions.sort_unstable();
    assert_eq!(positions, (0..7).collect::<Vec<_>>());
}

#[test]
fn term_frequencies_sum_to_one_over_the_vocabulary() {
    let corpus = tiny_corpus();
    let vocab = Vocabulary::build(&corpus).unwrap();
    for (_, tokens) in corpus.iter() {
        let sum: f64 = vocab
            .terms()
            .iter()
            .map(|term| term_frequency(term, tokens).unwrap())
            .sum();
        assert!((sum - 1.0).abs() < TOL);
    }
}

#[test]
fn term_frequency_is_zero_for_absent_terms() {
    let corpus = tiny_corpus();
    let tokens = corpus.tokens("1").unwrap();
    assert_eq!(term_frequency("bien", tokens).unwrap(), 0.0);
    assert_eq!(term_frequency("yo", tokens).unwrap(), 0.0);
}

#[test]
fn document_frequency_stays_within_bounds() {
    let corpus = tiny_corpus();
    let vocab = Vocabulary::build(&corpus).unwrap();
    for term in vocab.terms() {
        let df = document_frequency(term, &corpus);
        assert!(df >= 1);
        assert!(df <= corpus.len());
    }
    assert_eq!(document_frequency("hola", &corpus), 2);
    assert_eq!(document_frequency("yo", &corpus), 1);
}

#[test]
fn fitting_against_a_foreign_corpus_is_rejected() {
    let vocab = Vocabulary::build(&tiny_corpus()).unwrap();

    let mut other = BTreeMap::new();
    other.insert("x".to_string(), toks(&["hola"]));
    let err = TfIdfModel::fit(&Corpus::from_documents(other), vocab).unwrap_err();
    assert!(matches!(err, Error::InconsistentVocabulary(_)));
}

#[test]
fn fitting_a_corpus_with_an_empty_document_is_rejected() {
    let mut docs = BTreeMap::new();
    docs.insert("full".to_string(), toks(&["hola"]));
    docs.insert("hollow".to_string(), Vec::new());
    let corpus = Corpus::from_documents(docs);
    let vocab = Vocabulary::build(&corpus).unwrap();
    let err = TfIdfModel::fit(&corpus, vocab).unwrap_err();
    assert!(matches!(err, Error::EmptyDocument));
}

#[test]
fn all_empty_documents_count_as_an_empty_corpus() {
    let mut docs = BTreeMap::new();
    docs.insert("a".to_string(), Vec::new());
    docs.insert("b".to_string(), Vec::new());
    let err = Vocabulary::build(&Corpus::from_documents(docs)).unwrap_err();
    assert!(matches!(err, Error::EmptyCorpus));
}

#[test]
fn matching_scores_rank_the_expected_tale_first() {
    let model = tiny_model();
    let query = preprocess_query("hola como estas? yo");
    assert_eq!(query, toks(&["hola", "como", "estas", "yo"]));

    let ranked = rank::rank_by_matching(&model, &query, None).unwrap();
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].0, "1");

    // n = 3; df(hola) = df(como) = df(estas) = 2, df(yo) = 1
    let idf_common = (4.0_f64 / 3.0).ln();
    let idf_rare = 2.0_f64.ln();
    let expected_1 = 3.0 * (1.0 / 3.0) * idf_common;
    let expected_2 = 0.25 * idf_common + 0.25 * idf_rare;
    let expected_3 = 2.0 * (1.0 / 3.0) * idf_common;
    assert!((ranked[0].1 - expected_1).abs() < TOL);
    assert!((ranked[1].1 - expected_2).abs() < TOL);
    assert_eq!(ranked[1].0, "2");
    assert!((ranked[2].1 - expected_3).abs() < TOL);
    assert_eq!(ranked[2].0, "3");
}

#[test]
fn top_k_truncates_after_sorting() {
    let model = tiny_model();
    let query = toks(&["hola", "como", "estas", "yo"]);

    let top2 = rank::rank_by_matching(&model, &query, Some(2)).unwrap();
    assert_eq!(top2.len(), 2);
    assert_eq!(top2[0].0, "1");

    let all = rank::rank_by_matching(&model, &query, None).unwrap();
    assert_eq!(all.len(), model.num_docs());
    for pair in all.windows(2) {
        assert!(pair[0].1 >= pair[1].1);
    }
}

#[test]
fn ranking_is_deterministic() {
    let model = tiny_model();
    let query = toks(&["hola", "como", "estas", "yo"]);
    let first = rank::rank_by_matching(&model, &query, None).unwrap();
    let second = rank::rank_by_matching(&model, &query, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn cosine_ranking_agrees_on_the_best_tale() {
    let model = tiny_model();
    let query = toks(&["hola", "como", "estas", "yo"]);
    let ranked = rank::rank_by_cosine(&model, &query, None).unwrap();
    assert_eq!(ranked[0].0, "1");
    for (_, score) in &ranked {
        assert!(*score > 0.0 && *score <= 1.0 + TOL);
    }
}

#[test]
fn cosine_is_symmetric_and_self_similarity_is_one() {
    let model = tiny_model();
    let rows: Vec<Vec<f64>> = model
        .doc_weights()
        .values()
        .map(|row| vector::vectorize(row, model.vocab()))
        .collect();

    let ab = vector::cosine_similarity(&rows[0], &rows[1]).unwrap();
    let ba = vector::cosine_similarity(&rows[1], &rows[0]).unwrap();
    assert!((ab - ba).abs() < TOL);

    for row in &rows {
        let own = vector::cosine_similarity(row, row).unwrap();
        assert!((own - 1.0).abs() < TOL);
    }
}

#[test]
fn query_and_document_vectors_share_the_index() {
    let model = tiny_model();
    let query = toks(&["hola", "hola"]);
    let weights = model.query_weights(&query).unwrap();
    let qv = vector::vectorize(&weights, model.vocab());

    let hola = model.vocab().index_of("hola").unwrap();
    assert!(qv[hola] > 0.0);
    assert_eq!(qv.iter().filter(|w| **w != 0.0).count(), 1);
    assert_eq!(qv.len(), model.vocab().len());
}

#[test]
fn out_of_vocabulary_query_terms_are_ignored() {
    let model = tiny_model();
    let query = toks(&["hola", "xyz"]);

    let weights = model.query_weights(&query).unwrap();
    assert!(weights.contains_key("hola"));
    assert!(!weights.contains_key("xyz"));

    // still ranks, and "xyz" contributes nothing
    let ranked = rank::rank_by_matching(&model, &query, None).unwrap();
    assert_eq!(ranked.len(), 3);
}

#[test]
fn fully_out_of_vocabulary_query_scores_zero_by_matching() {
    let model = tiny_model();
    let query = toks(&["xyz", "abc"]);
    let ranked = rank::rank_by_matching(&model, &query, None).unwrap();
    // all-zero scores keep corpus order
    assert_eq!(ranked[0], ("1".to_string(), 0.0));
    assert_eq!(ranked[1], ("2".to_string(), 0.0));
    assert_eq!(ranked[2], ("3".to_string(), 0.0));
}

#[test]
fn fully_out_of_vocabulary_query_fails_cosine_explicitly() {
    let model = tiny_model();
    let query = toks(&["xyz", "abc"]);
    let err = rank::rank_by_cosine(&model, &query, None).unwrap_err();
    assert!(matches!(err, Error::ZeroVector));
}

#[test]
fn empty_query_is_rejected() {
    let model = tiny_model();
    let err = rank::rank_by_matching(&model, &[], None).unwrap_err();
    assert!(matches!(err, Error::EmptyQuery));
    let err = rank::rank_by_cosine(&model, &[], None).unwrap_err();
    assert!(matches!(err, Error::EmptyQuery));
}

#[test]
fn similarity_matrix_is_symmetric_with_unit_diagonal() {
    let model = tiny_model();
    let (titles, matrix) = vector::similarity_matrix(&model).unwrap();
    assert_eq!(titles, ["1", "2", "3"]);
    for i in 0..matrix.len() {
        assert!((matrix[i][i] - 1.0).abs() < TOL);
        for j in 0..matrix.len() {
            assert!((matrix[i][j] - matrix[j][i]).abs() < TOL);
        }
    }
    // tales 1 and 3 share two of three tokens, 1 and 2 only one of four
    assert!(matrix[0][2] > matrix[0][1]);
}

#[test]
fn ubiquitous_term_keeps_a_positive_weight() {
    let mut docs = BTreeMap::new();
    docs.insert("a".to_string(), toks(&["sol", "mar"]));
    docs.insert("b".to_string(), toks(&["sol", "rio"]));
    docs.insert("c".to_string(), toks(&["sol", "pan"]));
    let corpus = Corpus::from_documents(docs);
    let vocab = Vocabulary::build(&corpus).unwrap();
    let model = TfIdfModel::fit(&corpus, vocab).unwrap();

    // df(sol) = n, so its idf collapses to the epsilon floor
    assert_eq!(model.idf("sol").unwrap(), talesearch_core::tfidf::IDF_EPSILON);
    assert!(model.weight("a", "sol") > 0.0);

    let ranked = rank::rank_by_matching(&model, &toks(&["sol"]), None).unwrap();
    for (_, score) in &ranked {
        assert!(*score > 0.0);
    }
}
