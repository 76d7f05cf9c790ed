use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::normalize::normalize_terms;

pub type Year = String;
pub type ArticleId = String;

/// Annotated term-occurrence counts for one article in one year.
/// A term is present on the article iff its count is > 0. Ordered maps keep
/// every traversal (and therefore every query output) deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermCounts {
    #[serde(default)]
    pub tec: BTreeMap<String, u32>,
    #[serde(default)]
    pub env: BTreeMap<String, u32>,
}

/// Bibliographic fields for one article id. Ids found in the occurrence
/// table but not here resolve to the default (all-`None`) record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub url: Option<String>,
}

/// One row of the article listing: metadata joined with the term names that
/// matched the selection. `terms_founded` is the wire name consumers expect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "terms_founded")]
    pub terms_found: Vec<String>,
}

/// Normalized keyword sets for one query, technology and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermSelection {
    pub tec: BTreeSet<String>,
    pub env: BTreeSet<String>,
}

impl TermSelection {
    /// Build a selection from display-or-normalized names, normalizing each.
    pub fn from_names<I, J, S, T>(tec: I, env: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            tec: normalize_terms(tec),
            env: normalize_terms(env),
        }
    }

    /// True when either category is empty; no article can then satisfy the
    /// both-categories condition.
    pub fn is_degenerate(&self) -> bool {
        self.tec.is_empty() || self.env.is_empty()
    }
}

/// Aggregation key: the article's full positive-count term names, each side
/// sorted. Structural equality and ordering make two articles with the same
/// positive sets land in the same counter slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExactTermCombination {
    pub tec: Vec<String>,
    pub env: Vec<String>,
}

impl ExactTermCombination {
    /// Key for one article: names with count > 0, per category.
    /// `BTreeMap` keys iterate sorted, so no extra sort is needed.
    pub fn of_article(counts: &TermCounts) -> Self {
        let positive = |side: &BTreeMap<String, u32>| -> Vec<String> {
            side.iter()
                .filter(|(_, &count)| count > 0)
                .map(|(name, _)| name.clone())
                .collect()
        };
        Self {
            tec: positive(&counts.tec),
            env: positive(&counts.env),
        }
    }

    /// Key form of a selection, for the exact-combination lookup.
    pub fn of_selection(selection: &TermSelection) -> Self {
        Self {
            tec: selection.tec.iter().cloned().collect(),
            env: selection.env.iter().cloned().collect(),
        }
    }

    /// All term names in the key, technology first.
    pub fn flattened(&self) -> impl Iterator<Item = &String> {
        self.tec.iter().chain(self.env.iter())
    }
}

/// year -> article id -> matched term names (technology first).
pub type MatchResult = BTreeMap<Year, BTreeMap<ArticleId, Vec<String>>>;

/// year -> article id -> display record.
pub type ResolvedArticles = BTreeMap<Year, BTreeMap<ArticleId, DisplayRecord>>;

/// Combination key -> number of articles carrying exactly that combination.
pub type CombinationCount = BTreeMap<ExactTermCombination, u64>;
