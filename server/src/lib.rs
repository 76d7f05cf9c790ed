use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use termscope_core::combinations::{
    exact_combination_count, find_term_combinations, rank_combinations,
};
use termscope_core::search::find_complete_articles;
use termscope_core::summary::{summarize_matches, MatchSummary};
use termscope_core::{
    catalog, DataPaths, ExactTermCombination, ReferenceStore, ResolvedArticles, TermSelection,
    Year,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct ArticleParams {
    /// Comma-separated technology terms (display or normalized form)
    pub tec: String,
    /// Comma-separated environment terms
    pub env: String,
}

#[derive(Deserialize)]
pub struct CombinationParams {
    pub tec: String,
    pub env: String,
    /// Comma-separated year filter; empty means all years
    #[serde(default)]
    pub years: Option<String>,
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_top() -> usize {
    15
}

#[derive(Deserialize)]
pub struct ExactParams {
    pub tec: String,
    pub env: String,
    #[serde(default)]
    pub years: Option<String>,
}

#[derive(Serialize)]
pub struct ArticlesResponse {
    pub took_ms: u128,
    pub summary: MatchSummary,
    pub years: ResolvedArticles,
}

#[derive(Serialize)]
pub struct CombinationRow {
    pub tec: Vec<String>,
    pub env: Vec<String>,
    pub count: u64,
}

impl From<(ExactTermCombination, u64)> for CombinationRow {
    fn from((key, count): (ExactTermCombination, u64)) -> Self {
        Self { tec: key.tec, env: key.env, count }
    }
}

#[derive(Serialize)]
pub struct CombinationsResponse {
    pub took_ms: u128,
    pub total_combinations: usize,
    pub combinations: Vec<CombinationRow>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReferenceStore>,
}

pub fn build_app(data_dir: String) -> Result<Router> {
    // Load the reference data once at startup; handlers share it read-only
    let store = ReferenceStore::load(&DataPaths::new(&data_dir))?;
    let state = AppState { store: Arc::new(store) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/keywords", get(keywords_handler))
        .route("/articles", get(articles_handler))
        .route("/combinations", get(combinations_handler))
        .route("/combinations/exact", get(exact_handler))
        .with_state(state)
        .layer(cors);
    Ok(app)
}

/// Split a comma-separated parameter and normalize the pieces into a
/// selection. Empty categories are a caller error, not a core concern.
fn parse_selection(tec: &str, env: &str) -> Result<TermSelection, (StatusCode, String)> {
    let selection = TermSelection::from_names(
        tec.split(',').map(str::trim).filter(|s| !s.is_empty()),
        env.split(',').map(str::trim).filter(|s| !s.is_empty()),
    );
    if selection.is_degenerate() {
        return Err((
            StatusCode::BAD_REQUEST,
            "select at least one technology and one environment term".into(),
        ));
    }
    Ok(selection)
}

fn parse_years(years: &Option<String>) -> Vec<Year> {
    years
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn keywords_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "technologies": catalog::technologies(),
        "environment": catalog::environment_terms(),
        "technology_variations": catalog::technology_variations(),
        "environment_variations": catalog::environment_variations(),
    }))
}

pub async fn articles_handler(
    State(state): State<AppState>,
    Query(params): Query<ArticleParams>,
) -> Result<Json<ArticlesResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let selection = parse_selection(&params.tec, &params.env)?;

    let years = find_complete_articles(&state.store, &selection);
    let summary = summarize_matches(&years);
    tracing::debug!(total = summary.total_articles, "article query served");

    Ok(Json(ArticlesResponse { took_ms: start.elapsed().as_millis(), summary, years }))
}

pub async fn combinations_handler(
    State(state): State<AppState>,
    Query(params): Query<CombinationParams>,
) -> Result<Json<CombinationsResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let selection = parse_selection(&params.tec, &params.env)?;
    let years = parse_years(&params.years);

    let counts = find_term_combinations(&state.store, &selection, &years);
    let total_combinations = counts.len();
    let combinations = rank_combinations(&counts, Some(params.top.max(1)))
        .into_iter()
        .map(CombinationRow::from)
        .collect();

    Ok(Json(CombinationsResponse {
        took_ms: start.elapsed().as_millis(),
        total_combinations,
        combinations,
    }))
}

pub async fn exact_handler(
    State(state): State<AppState>,
    Query(params): Query<ExactParams>,
) -> Result<Json<CombinationRow>, (StatusCode, String)> {
    let selection = parse_selection(&params.tec, &params.env)?;
    let years = parse_years(&params.years);

    let entry = exact_combination_count(&state.store, &selection, &years);
    Ok(Json(CombinationRow::from(entry)))
}
