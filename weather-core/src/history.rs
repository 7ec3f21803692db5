//! Recent-search list persisted as a JSON array of city names.
//!
//! Persistence is best-effort: read and write failures are logged and
//! swallowed, so the in-memory list stays authoritative for the running
//! process even when the file cannot be written.

use anyhow::{Context, Result};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Maximum number of remembered searches.
pub const MAX_ENTRIES: usize = 20;

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<String>,
}

impl HistoryStore {
    /// Open the store backed by `path`. A missing or corrupt file yields an
    /// empty history.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load_entries(&path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Ignoring unreadable search history: {err:#}");
                Vec::new()
            }
        };

        Self { path, entries }
    }

    /// Remember a successful search. Already-known cities keep their position.
    pub fn record(&mut self, city: &str) {
        if self.entries.iter().any(|entry| entry == city) {
            return;
        }

        self.entries.insert(0, city.to_string());
        self.entries.truncate(MAX_ENTRIES);
        self.persist();
    }

    /// Most-recent-first.
    pub fn list(&self) -> &[String] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            warn!("Search history not persisted: {err:#}");
        }
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string(&self.entries)
            .context("Failed to serialize search history")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;

        debug!(path = %self.path.display(), entries = self.entries.len(), "search history saved");
        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<Vec<String>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read history file: {}", path.display()));
        }
    };

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse history file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::open(dir.path().join("weather_history.json"))
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("weather_history.json");
        fs::write(&path, "{ not json").expect("write");

        let store = HistoryStore::open(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn non_string_entries_start_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("weather_history.json");
        fs::write(&path, "[1, 2, 3]").expect("write");

        assert!(HistoryStore::open(&path).is_empty());
    }

    #[test]
    fn record_inserts_most_recent_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(&dir);

        store.record("Paris");
        store.record("Tokyo");

        assert_eq!(store.list(), ["Tokyo", "Paris"]);
    }

    #[test]
    fn duplicate_is_ignored_without_moving() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(&dir);

        store.record("Paris");
        store.record("Paris");
        assert_eq!(store.list(), ["Paris"]);

        store.record("Oslo");
        store.record("Paris");
        assert_eq!(store.list(), ["Oslo", "Paris"]);
    }

    #[test]
    fn duplicates_are_case_sensitive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(&dir);

        store.record("paris");
        store.record("Paris");

        assert_eq!(store.list(), ["Paris", "paris"]);
    }

    #[test]
    fn history_is_capped_at_twenty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(&dir);

        for i in 0..25 {
            store.record(&format!("City{i}"));
        }

        assert_eq!(store.len(), MAX_ENTRIES);
        assert_eq!(store.list().first().map(String::as_str), Some("City24"));
        assert_eq!(store.list().last().map(String::as_str), Some("City5"));
        assert!(!store.list().iter().any(|c| c == "City4"));
    }

    #[test]
    fn history_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let mut store = store_in(&dir);
            store.record("Lima");
            store.record("Quito");
        }

        let reopened = store_in(&dir);
        assert_eq!(reopened.list(), ["Quito", "Lima"]);
    }

    #[test]
    fn clear_empties_memory_and_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = store_in(&dir);
        store.record("Paris");

        store.clear();
        assert!(store.list().is_empty());

        let reopened = store_in(&dir);
        assert!(reopened.list().is_empty());
        let raw = fs::read_to_string(reopened.path()).expect("file must exist");
        assert_eq!(raw, "[]");
    }

    #[test]
    fn write_failure_keeps_memory_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("blocked");
        fs::create_dir(&path).expect("mkdir");

        let mut store = HistoryStore::open(&path);
        store.record("Berlin");

        assert_eq!(store.list(), ["Berlin"]);
    }

    #[test]
    fn parent_directories_are_created() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("a").join("b").join("history.json");

        let mut store = HistoryStore::open(&path);
        store.record("Cairo");

        assert!(path.exists());
    }
}
