use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WS: Regex = Regex::new(r"\s+").expect("valid regex");
}

/// Canonical key form of a keyword: NFKC normalization, lowercase, and
/// whitespace runs joined with a single underscore, e.g.
/// "Machine Learning" -> "machine_learning". Must match the normalization
/// applied when the reference data's term keys were produced.
pub fn normalize_term(raw: &str) -> String {
    let folded = raw.nfkc().collect::<String>().to_lowercase();
    WS.replace_all(folded.trim(), "_").into_owned()
}

/// Normalize a batch of names into a selection-ready set, dropping entries
/// that normalize to nothing.
pub fn normalize_terms<I, S>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|name| normalize_term(name.as_ref()))
        .filter(|name| !name.is_empty())
        .collect()
}
