use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

pub const DEFAULT_KEY: &str = "flappy-arcade-best";

/// Where the single best score lives between runs.
pub trait ScoreStore {
    fn load(&self) -> Result<u32>;
    fn save(&mut self, best: u32) -> Result<()>;
}

/// Best score kept as one key in a small JSON object file. Other keys in the
/// file are left alone.
pub struct JsonFileStore {
    path: PathBuf,
    key: String,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    /// `scores.json` in the platform data directory.
    pub fn in_data_dir() -> Result<Self> {
        Ok(Self::new(data_dir()?.join("scores.json"), DEFAULT_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File contents, or `None` when there is no file yet.
    fn read_text(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    fn parse_map(&self, text: &str) -> Result<BTreeMap<String, serde_json::Value>> {
        serde_json::from_str(text).with_context(|| format!("parsing {}", self.path.display()))
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32> {
        let map = match self.read_text()? {
            Some(text) => self.parse_map(&text)?,
            None => BTreeMap::new(),
        };
        Ok(map
            .get(&self.key)
            .and_then(|v| v.as_u64())
            .map(|v| v.min(u32::MAX as u64) as u32)
            .unwrap_or(0))
    }

    fn save(&mut self, best: u32) -> Result<()> {
        // A corrupt file gets replaced rather than blocking the save; an
        // unreadable one is left alone.
        let mut map = match self.read_text()? {
            Some(text) => self.parse_map(&text).unwrap_or_default(),
            None => BTreeMap::new(),
        };
        map.insert(self.key.clone(), best.into());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, text).with_context(|| format!("writing {}", self.path.display()))
    }
}

/// Non-persistent store for tests and `--no-save`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub best: u32,
    pub saves: u32,
}

impl MemoryStore {
    pub fn with_best(best: u32) -> Self {
        Self { best, saves: 0 }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<u32> {
        Ok(self.best)
    }

    fn save(&mut self, best: u32) -> Result<()> {
        self.best = best;
        self.saves += 1;
        Ok(())
    }
}

pub fn data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "flappy-arcade")
        .context("could not determine a data directory for this platform")?;
    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("scores.json"), DEFAULT_KEY);
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn save_then_load_in_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("a/b/scores.json"), DEFAULT_KEY);
        store.save(17).unwrap();
        assert_eq!(store.load().unwrap(), 17);
    }

    #[test]
    fn other_keys_survive_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, r#"{"volume": 3, "flappy-arcade-best": 2}"#).unwrap();

        let mut store = JsonFileStore::new(&path, DEFAULT_KEY);
        assert_eq!(store.load().unwrap(), 2);
        store.save(5).unwrap();

        let map: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(map["volume"], 3);
        assert_eq!(map[DEFAULT_KEY], 5);
    }

    #[test]
    fn corrupt_file_errors_on_load_and_is_replaced_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "not json").unwrap();

        let mut store = JsonFileStore::new(&path, DEFAULT_KEY);
        assert!(store.load().is_err());
        store.save(4).unwrap();
        assert_eq!(store.load().unwrap(), 4);
    }

    #[test]
    fn unreadable_file_fails_the_save_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be: reading fails, but not with
        // NotFound.
        let path = dir.path().join("scores.json");
        fs::create_dir(&path).unwrap();

        let mut store = JsonFileStore::new(&path, DEFAULT_KEY);
        let err = store.save(9).unwrap_err();
        assert!(format!("{err:#}").contains("reading"), "{err:#}");
        assert!(path.is_dir());
    }

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemoryStore::with_best(1);
        store.save(2).unwrap();
        assert_eq!(store.load().unwrap(), 2);
        assert_eq!(store.saves, 1);
    }
}
