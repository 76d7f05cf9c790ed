use crate::model::{DisplayRecord, MatchResult, ResolvedArticles, TermSelection};
use crate::store::ReferenceStore;
use std::collections::BTreeMap;

/// Find articles carrying at least one selected technology term and at
/// least one selected environment term with positive counts. Within a
/// category any one selected term suffices; across categories both must
/// hit. Values are the matched term names, technology first.
pub fn find_matching_terms(store: &ReferenceStore, selection: &TermSelection) -> MatchResult {
    let mut found: MatchResult = BTreeMap::new();

    for (year, articles) in store.occurrences() {
        for (id, counts) in articles {
            let tec_hits: Vec<String> = counts
                .tec
                .iter()
                .filter(|(name, &count)| count > 0 && selection.tec.contains(name.as_str()))
                .map(|(name, _)| name.clone())
                .collect();
            let env_hits: Vec<String> = counts
                .env
                .iter()
                .filter(|(name, &count)| count > 0 && selection.env.contains(name.as_str()))
                .map(|(name, _)| name.clone())
                .collect();

            if tec_hits.is_empty() || env_hits.is_empty() {
                continue;
            }

            let mut terms = tec_hits;
            terms.extend(env_hits);
            found.entry(year.clone()).or_default().insert(id.clone(), terms);
        }
    }

    found
}

/// Join matched articles against the metadata table to build the article
/// listing. Ids missing from the metadata table resolve to an empty record
/// rather than an error.
pub fn find_complete_articles(
    store: &ReferenceStore,
    selection: &TermSelection,
) -> ResolvedArticles {
    let matches = find_matching_terms(store, selection);
    let mut resolved: ResolvedArticles = BTreeMap::new();

    for (year, articles) in matches {
        let by_id = resolved.entry(year).or_default();
        for (id, terms_found) in articles {
            let meta = store.metadata(&id).cloned().unwrap_or_default();
            by_id.insert(
                id,
                DisplayRecord {
                    title: meta.title,
                    abstract_text: meta.abstract_text,
                    url: meta.url,
                    terms_found,
                },
            );
        }
    }

    resolved
}
