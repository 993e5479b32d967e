pub(crate) fn tokenize(value: &str) -> Vec<String> {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split_whitespace()
        .map(|token| token.to_lowercase())
        .collect()
}

/// Case-insensitive, order-independent token search.
///
/// Every whitespace-separated token of `query` must appear as a substring of
/// `text`. An empty query matches everything.
pub fn fuzzy_match(query: &str, text: &str) -> bool {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return true;
    }

    let haystack = text.to_lowercase();
    tokens.iter().all(|token| haystack.contains(token.as_str()))
}
