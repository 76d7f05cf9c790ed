use crate::model::{ArticleId, ArticleMetadata, TermCounts, Year};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// year -> article id -> occurrence counts.
pub type OccurrenceTable = BTreeMap<Year, BTreeMap<ArticleId, TermCounts>>;
/// article id -> bibliographic fields.
pub type MetadataTable = HashMap<ArticleId, ArticleMetadata>;

/// Locations of the two reference data files inside one data directory.
pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn occurrences(&self) -> PathBuf { self.root.join("terms-by-year.json") }
    fn metadata(&self) -> PathBuf { self.root.join("articles.json") }
}

/// Read-only reference tables, loaded once and never mutated. Counts decode
/// as `u32`, so malformed documents fail the load instead of reaching the
/// query paths.
pub struct ReferenceStore {
    occurrences: OccurrenceTable,
    metadata: MetadataTable,
}

impl ReferenceStore {
    /// Load both tables. Fatal on a missing or unparseable file; the engine
    /// cannot operate without its reference data.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let occurrences = load_occurrences(paths)?;
        let metadata = load_metadata(paths)?;
        let num_articles: usize = occurrences.values().map(|a| a.len()).sum();
        tracing::info!(
            years = occurrences.len(),
            num_articles,
            metadata_rows = metadata.len(),
            "reference data loaded"
        );
        Ok(Self { occurrences, metadata })
    }

    /// Assemble a store from already-built tables (tests, fixtures).
    pub fn from_tables(occurrences: OccurrenceTable, metadata: MetadataTable) -> Self {
        Self { occurrences, metadata }
    }

    pub fn occurrences(&self) -> &OccurrenceTable {
        &self.occurrences
    }

    pub fn metadata(&self, id: &str) -> Option<&ArticleMetadata> {
        self.metadata.get(id)
    }
}

pub fn load_occurrences(paths: &DataPaths) -> Result<OccurrenceTable> {
    let path = paths.occurrences();
    let f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let table = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(table)
}

pub fn load_metadata(paths: &DataPaths) -> Result<MetadataTable> {
    let path = paths.metadata();
    let f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let table = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_both_tables_from_a_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("terms-by-year.json"),
            r#"{"2020": {"a1": {"tec": {"iot": 2}, "env": {"eia": 1}}}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("articles.json"),
            r#"{"a1": {"title": "T", "abstract": null, "url": "http://x"}}"#,
        )
        .unwrap();

        let store = ReferenceStore::load(&DataPaths::new(dir.path())).unwrap();
        assert_eq!(store.occurrences().len(), 1);
        assert_eq!(store.metadata("a1").unwrap().title.as_deref(), Some("T"));
        assert!(store.metadata("missing").is_none());
    }

    #[test]
    fn negative_counts_fail_the_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("terms-by-year.json"),
            r#"{"2020": {"a1": {"tec": {"iot": -1}, "env": {}}}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("articles.json"), "{}").unwrap();

        assert!(ReferenceStore::load(&DataPaths::new(dir.path())).is_err());
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ReferenceStore::load(&DataPaths::new(dir.path())).is_err());
    }
}
