//! Persistence for the usage counter, search history and request log.
//!
//! Every store is a single JSON document rewritten as a whole on each change.
//! There is no locking: concurrent writers race and the last one wins.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

pub trait RecordStore<T>: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<T>>;
    fn save(&self, value: &T) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Serialize + DeserializeOwned> RecordStore<T> for JsonFileStore<T> {
    fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Reading {}", self.path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("Parsing {}", self.path.display()))?;
        Ok(Some(value))
    }

    fn save(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Creating {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&self.path, json).with_context(|| format!("Writing {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Removing {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// Newest first; whatever falls past `cap` at the back is dropped.
pub fn push_front_bounded<T>(items: &mut Vec<T>, item: T, cap: usize) {
    items.insert(0, item);
    items.truncate(cap);
}

/// Oldest first; whatever falls past `cap` at the front is dropped.
pub fn push_back_bounded<T>(items: &mut Vec<T>, item: T, cap: usize) {
    items.push(item);
    if items.len() > cap {
        let excess = items.len() - cap;
        items.drain(..excess);
    }
}

#[cfg(test)]
pub use memory::MemoryStore;


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempdir().unwrap();
        let store: JsonFileStore<Vec<u32>> = JsonFileStore::new(dir.path().join("numbers.json"));

        assert_eq!(store.load().unwrap(), None);
        store.save(&vec![3, 2, 1]).unwrap();
        assert_eq!(store.load().unwrap(), Some(vec![3, 2, 1]));

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), None);
        // clearing twice is not an error
        store.clear().unwrap();
    }

    #[test]
    fn file_store_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let store: JsonFileStore<String> =
            JsonFileStore::new(dir.path().join("nested").join("deeper").join("value.json"));
        store.save(&"hello".to_string()).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn file_store_reports_corrupt_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        let store: JsonFileStore<Vec<u32>> = JsonFileStore::new(&path);
        assert!(store.load().is_err());
    }

    #[test]
    fn push_front_bounded_evicts_oldest_at_the_back() {
        let mut items: Vec<u32> = (1..=3).rev().collect(); // [3, 2, 1]
        push_front_bounded(&mut items, 4, 3);
        assert_eq!(items, vec![4, 3, 2]);
    }

    #[test]
    fn push_back_bounded_evicts_oldest_at_the_front() {
        let mut items = vec![1, 2, 3];
        push_back_bounded(&mut items, 4, 3);
        assert_eq!(items, vec![2, 3, 4]);

        let mut short = vec![1];
        push_back_bounded(&mut short, 2, 3);
        assert_eq!(short, vec![1, 2]);
    }
}
