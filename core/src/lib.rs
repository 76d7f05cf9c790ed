pub mod catalog;
pub mod combinations;
pub mod model;
pub mod normalize;
pub mod search;
pub mod store;
pub mod summary;

pub use model::{
    ArticleId, ArticleMetadata, CombinationCount, DisplayRecord, ExactTermCombination,
    MatchResult, ResolvedArticles, TermCounts, TermSelection, Year,
};
pub use store::{DataPaths, ReferenceStore};
