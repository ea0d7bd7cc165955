use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Anything that is not a letter or whitespace: punctuation, digits,
    // stray symbols from the extraction stage.
    static ref NON_LETTER: Regex = Regex::new(r"[^\p{L}\s]").expect("valid regex");
    // Characters the page extractor is known to leak into the text.
    static ref ARTIFACTS: Regex = Regex::new(r"[Š]").expect("valid regex");
}

/// Normalize raw text: NFKC fold, drop punctuation/digits/extraction
/// artifacts, lowercase, collapse whitespace.
pub fn normalize(text: &str) -> String {
    let folded = text.nfkc().collect::<String>();
    let stripped = ARTIFACTS.replace_all(&folded, "");
    let stripped = NON_LETTER.replace_all(&stripped, "");
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize and split on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Token sequence for one tale given its raw page texts.
///
/// The first segment is the tale's title page and is dropped; the remaining
/// pages are normalized and joined. A single-segment tale yields no tokens.
pub fn clean_pages(pages: &[String]) -> Vec<String> {
    pages
        .iter()
        .skip(1)
        .flat_map(|page| tokenize(page))
        .collect()
}

/// Query-side preprocessing, same rules as document cleaning so query and
/// document tokens are comparable.
pub fn preprocess_query(raw: &str) -> Vec<String> {
    tokenize(raw)
}
