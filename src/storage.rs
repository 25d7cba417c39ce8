use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

/// Namespace key under which the alarm list is persisted.
pub const ALARMS_KEY: &str = "neon-alarms";

/// Synchronous string key-value store. Reads happen once at startup; every
/// alarm mutation writes the full serialized set back through `set`.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Key-value store backed by one file per key under a data directory.
pub struct FileKvStore {
    root: PathBuf,
}

impl FileKvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                warn!("unable to read {}: {err}", path.display());
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        ensure_dir(&self.root)?;
        let path = self.path_for(key);
        fs::write(&path, value)
            .with_context(|| format!("unable to write data file {}", path.display()))
    }
}

fn ensure_dir(root: &Path) -> Result<()> {
    fs::create_dir_all(root)
        .with_context(|| format!("unable to create data directory {}", root.display()))
}

/// In-memory store for tests. Clones share the same entries so a test can
/// observe what the store wrote through.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
}

#[cfg(test)]
impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
