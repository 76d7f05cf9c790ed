use crate::model::{ArticleId, Year};
use serde::Serialize;
use std::collections::BTreeMap;

/// Headline numbers over a match result: how many articles, over which
/// years, at what average per year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchSummary {
    pub total_articles: usize,
    pub first_year: Option<Year>,
    pub last_year: Option<Year>,
    pub mean_per_year: f64,
}

/// Works over any year -> id -> record shape, so both the raw match result
/// and the resolved article listing summarize the same way.
pub fn summarize_matches<V>(result: &BTreeMap<Year, BTreeMap<ArticleId, V>>) -> MatchSummary {
    let total_articles: usize = result.values().map(|by_id| by_id.len()).sum();
    if result.is_empty() {
        return MatchSummary::default();
    }
    MatchSummary {
        total_articles,
        first_year: result.keys().next().cloned(),
        last_year: result.keys().next_back().cloned(),
        mean_per_year: total_articles as f64 / result.len() as f64,
    }
}
