use crate::model::{CombinationCount, ExactTermCombination, TermSelection, Year};
use crate::store::ReferenceStore;
use std::collections::BTreeMap;

/// Per-year tally of exact positive-term combinations across the whole
/// corpus, independent of any selection. Articles whose technology or
/// environment side is empty still tally here; the selection filter in
/// [`find_term_combinations`] discards them.
pub fn combinations_by_year(store: &ReferenceStore) -> BTreeMap<Year, CombinationCount> {
    let mut by_year: BTreeMap<Year, CombinationCount> = BTreeMap::new();

    for (year, articles) in store.occurrences() {
        let counter = by_year.entry(year.clone()).or_default();
        for counts in articles.values() {
            let key = ExactTermCombination::of_article(counts);
            *counter.entry(key).or_insert(0) += 1;
        }
    }

    by_year
}

/// Filter the per-year tallies down to combinations containing at least one
/// selected term from each category, summing counts across the requested
/// years (all years when `years` is empty). The full combination is kept as
/// the key: selecting a subset of an article's terms still surfaces the
/// article's complete combination.
pub fn find_term_combinations(
    store: &ReferenceStore,
    selection: &TermSelection,
    years: &[Year],
) -> CombinationCount {
    let by_year = combinations_by_year(store);
    let mut merged = CombinationCount::new();

    for (year, counter) in &by_year {
        if !years.is_empty() && !years.contains(year) {
            continue;
        }
        for (key, count) in counter {
            let tec_hit = key.flattened().any(|t| selection.tec.contains(t));
            let env_hit = key.flattened().any(|t| selection.env.contains(t));
            if tec_hit && env_hit {
                *merged.entry(key.clone()).or_insert(0) += count;
            }
        }
    }

    merged
}

/// Aggregate count for the one combination whose term sets equal the
/// selection exactly. 0 when no article carries exactly that combination,
/// even if other combinations qualify.
pub fn exact_combination_count(
    store: &ReferenceStore,
    selection: &TermSelection,
    years: &[Year],
) -> (ExactTermCombination, u64) {
    let key = ExactTermCombination::of_selection(selection);
    let count = find_term_combinations(store, selection, years)
        .get(&key)
        .copied()
        .unwrap_or(0);
    (key, count)
}

/// Display order: count descending, ties broken by combination key
/// (technology sequence, then environment) so equal counts always come out
/// in the same order.
pub fn rank_combinations(
    counts: &CombinationCount,
    top: Option<usize>,
) -> Vec<(ExactTermCombination, u64)> {
    let mut ranked: Vec<(ExactTermCombination, u64)> =
        counts.iter().map(|(key, &count)| (key.clone(), count)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if let Some(top) = top {
        ranked.truncate(top);
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TermCounts;
    use crate::store::{MetadataTable, OccurrenceTable};

    fn counts(tec: &[(&str, u32)], env: &[(&str, u32)]) -> TermCounts {
        TermCounts {
            tec: tec.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            env: env.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn store_with(articles: Vec<(&str, &str, TermCounts)>) -> ReferenceStore {
        let mut occurrences: OccurrenceTable = OccurrenceTable::new();
        for (year, id, c) in articles {
            occurrences
                .entry(year.to_string())
                .or_default()
                .insert(id.to_string(), c);
        }
        ReferenceStore::from_tables(occurrences, MetadataTable::new())
    }

    fn key(tec: &[&str], env: &[&str]) -> ExactTermCombination {
        ExactTermCombination {
            tec: tec.iter().map(|s| s.to_string()).collect(),
            env: env.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn identical_positive_sets_share_one_slot() {
        let store = store_with(vec![
            ("2020", "a1", counts(&[("iot", 2)], &[("eia", 1)])),
            ("2020", "a2", counts(&[("iot", 7)], &[("eia", 3)])),
            ("2021", "a3", counts(&[("iot", 1)], &[("eia", 9)])),
        ]);
        let by_year = combinations_by_year(&store);
        assert_eq!(by_year["2020"][&key(&["iot"], &["eia"])], 2);
        assert_eq!(by_year["2021"][&key(&["iot"], &["eia"])], 1);
    }

    #[test]
    fn full_combination_survives_partial_selection() {
        // Article tagged with two technologies; selecting only one of them
        // still surfaces the full two-technology combination.
        let store = store_with(vec![(
            "2020",
            "a1",
            counts(&[("ai", 1), ("iot", 2)], &[("eia", 1)]),
        )]);
        let selection = TermSelection::from_names(["iot"], ["eia"]);

        let combos = find_term_combinations(&store, &selection, &[]);
        assert_eq!(combos.len(), 1);
        assert_eq!(combos[&key(&["ai", "iot"], &["eia"])], 1);
    }

    #[test]
    fn zero_count_terms_stay_out_of_the_key() {
        let store = store_with(vec![(
            "2020",
            "a1",
            counts(&[("iot", 2), ("ai", 0)], &[("eia", 1)]),
        )]);
        let selection = TermSelection::from_names(["iot"], ["eia"]);
        let combos = find_term_combinations(&store, &selection, &[]);
        assert_eq!(combos[&key(&["iot"], &["eia"])], 1);
    }

    #[test]
    fn selection_missing_from_article_yields_nothing() {
        // "ai" only ever appears with count 0, so the filter never passes
        let store = store_with(vec![(
            "2020",
            "a1",
            counts(&[("iot", 2), ("ai", 0)], &[("eia", 1)]),
        )]);
        let selection = TermSelection::from_names(["ai"], ["eia"]);
        assert!(find_term_combinations(&store, &selection, &[]).is_empty());
    }

    #[test]
    fn year_filter_restricts_and_sums() {
        let store = store_with(vec![
            ("2019", "a1", counts(&[("iot", 1)], &[("eia", 1)])),
            ("2020", "a2", counts(&[("iot", 1)], &[("eia", 1)])),
            ("2021", "a3", counts(&[("iot", 1)], &[("eia", 1)])),
        ]);
        let selection = TermSelection::from_names(["iot"], ["eia"]);
        let k = key(&["iot"], &["eia"]);

        let all = find_term_combinations(&store, &selection, &[]);
        assert_eq!(all[&k], 3);

        let two = find_term_combinations(
            &store,
            &selection,
            &["2019".to_string(), "2021".to_string()],
        );
        assert_eq!(two[&k], 2);

        let none = find_term_combinations(&store, &selection, &["1999".to_string()]);
        assert!(none.is_empty());
    }

    #[test]
    fn exact_lookup_defaults_to_zero() {
        let store = store_with(vec![(
            "2020",
            "a1",
            counts(&[("ai", 1), ("iot", 2)], &[("eia", 1)]),
        )]);
        // Aggregation is non-empty for the two-technology combination, but
        // the exact key ("iot")/("eia") was never an article's full set.
        let selection = TermSelection::from_names(["iot"], ["eia"]);
        assert!(!find_term_combinations(&store, &selection, &[]).is_empty());

        let (k, count) = exact_combination_count(&store, &selection, &[]);
        assert_eq!(k, key(&["iot"], &["eia"]));
        assert_eq!(count, 0);
    }

    #[test]
    fn exact_lookup_counts_exact_matches() {
        let store = store_with(vec![
            ("2020", "a1", counts(&[("iot", 2)], &[("eia", 1)])),
            ("2021", "a2", counts(&[("iot", 5)], &[("eia", 2)])),
        ]);
        let selection = TermSelection::from_names(["iot"], ["eia"]);
        let (_, count) = exact_combination_count(&store, &selection, &[]);
        assert_eq!(count, 2);
    }

    #[test]
    fn ranking_is_descending_with_key_tiebreak() {
        let mut combos = CombinationCount::new();
        combos.insert(key(&["b"], &["x"]), 2);
        combos.insert(key(&["a"], &["x"]), 2);
        combos.insert(key(&["c"], &["x"]), 5);

        let ranked = rank_combinations(&combos, None);
        assert_eq!(ranked[0].0, key(&["c"], &["x"]));
        assert_eq!(ranked[1].0, key(&["a"], &["x"]));
        assert_eq!(ranked[2].0, key(&["b"], &["x"]));

        let top = rank_combinations(&combos, Some(1));
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].1, 5);
    }
}
