use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use termscope_core::combinations::{
    exact_combination_count, find_term_combinations, rank_combinations,
};
use termscope_core::search::find_complete_articles;
use termscope_core::summary::{summarize_matches, MatchSummary};
use termscope_core::{DataPaths, ReferenceStore, TermSelection, Year};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "termscope")]
#[command(about = "Query term co-occurrence across a scientific article corpus", long_about = None)]
struct Cli {
    /// Directory holding terms-by-year.json and articles.json
    #[arg(long, default_value = "./data")]
    data: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List matching articles with their metadata, grouped by year
    Articles {
        /// Technology terms (display or normalized form)
        #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
        tec: Vec<String>,
        /// Environment terms
        #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
        env: Vec<String>,
    },
    /// Rank exact term combinations by article count
    Combinations {
        #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
        tec: Vec<String>,
        #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
        env: Vec<String>,
        /// Restrict to these years (default: all)
        #[arg(long, num_args = 0.., value_delimiter = ',')]
        years: Vec<String>,
        /// Keep only the most frequent combinations
        #[arg(long)]
        top: Option<usize>,
    },
    /// Count articles whose term sets equal the selection exactly
    Tuple {
        #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
        tec: Vec<String>,
        #[arg(long, required = true, num_args = 1.., value_delimiter = ',')]
        env: Vec<String>,
        #[arg(long, num_args = 0.., value_delimiter = ',')]
        years: Vec<String>,
    },
    /// Print corpus statistics
    Stats,
}

#[derive(Serialize)]
struct ArticlesOutput {
    summary: MatchSummary,
    years: termscope_core::ResolvedArticles,
}

#[derive(Serialize)]
struct CombinationOutput {
    tec: Vec<String>,
    env: Vec<String>,
    count: u64,
}

#[derive(Serialize)]
struct YearStats {
    articles: usize,
    distinct_tec_terms: usize,
    distinct_env_terms: usize,
}

#[derive(Serialize)]
struct StatsOutput {
    generated_at: String,
    years: BTreeMap<Year, YearStats>,
    total_articles: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let store = ReferenceStore::load(&DataPaths::new(&cli.data))?;
    tracing::debug!(data = %cli.data, "reference data ready");

    match cli.command {
        Commands::Articles { tec, env } => {
            let selection = selection_or_exit(&tec, &env);
            let years = find_complete_articles(&store, &selection);
            let summary = summarize_matches(&years);
            print_json(&ArticlesOutput { summary, years })
        }
        Commands::Combinations { tec, env, years, top } => {
            let selection = selection_or_exit(&tec, &env);
            let counts = find_term_combinations(&store, &selection, &years);
            let rows: Vec<CombinationOutput> = rank_combinations(&counts, top)
                .into_iter()
                .map(|(key, count)| CombinationOutput { tec: key.tec, env: key.env, count })
                .collect();
            print_json(&rows)
        }
        Commands::Tuple { tec, env, years } => {
            let selection = selection_or_exit(&tec, &env);
            let (key, count) = exact_combination_count(&store, &selection, &years);
            print_json(&CombinationOutput { tec: key.tec, env: key.env, count })
        }
        Commands::Stats => {
            let mut years = BTreeMap::new();
            let mut total_articles = 0usize;
            for (year, articles) in store.occurrences() {
                let mut tec_terms = std::collections::BTreeSet::new();
                let mut env_terms = std::collections::BTreeSet::new();
                for counts in articles.values() {
                    tec_terms
                        .extend(counts.tec.iter().filter(|(_, &c)| c > 0).map(|(t, _)| t.clone()));
                    env_terms
                        .extend(counts.env.iter().filter(|(_, &c)| c > 0).map(|(t, _)| t.clone()));
                }
                total_articles += articles.len();
                years.insert(
                    year.clone(),
                    YearStats {
                        articles: articles.len(),
                        distinct_tec_terms: tec_terms.len(),
                        distinct_env_terms: env_terms.len(),
                    },
                );
            }
            let generated_at = time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "".into());
            print_json(&StatsOutput { generated_at, years, total_articles })
        }
    }
}

fn selection_or_exit(tec: &[String], env: &[String]) -> TermSelection {
    let selection = TermSelection::from_names(tec, env);
    if selection.is_degenerate() {
        // clap guarantees at least one value per flag, but they may all
        // normalize to nothing
        eprintln!("select at least one technology and one environment term");
        std::process::exit(2);
    }
    selection
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
