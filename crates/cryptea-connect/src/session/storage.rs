/*
[INPUT]:  Keyed string records from the session layer
[OUTPUT]: Durable local storage with atomic multi-record writes
[POS]:    Session layer - persistence backend
[UPDATE]: When the on-disk format or atomicity strategy changes
*/

use std::collections::HashMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::warn;

use crate::http::Result;

/// Keyed string records, the durable-storage interface the session
/// store is written against.
///
/// `put_many` and `remove_many` must be atomic from a reader's point of
/// view: no observer may see one record of a batch without the others.
pub trait KvStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn put_many(&self, entries: &[(&str, &str)]) -> Result<()>;
    fn remove_many(&self, keys: &[&str]) -> Result<()>;
}

/// In-memory storage for tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    map: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.read().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.map
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn put_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.map.write().unwrap();
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut map = self.map.write().unwrap();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// File-backed storage holding every record in one JSON map, rewritten
/// through a temp file and rename so a batch lands all-or-nothing.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_map(&self) -> HashMap<String, String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return HashMap::new();
        };

        match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding unreadable session file");
                HashMap::new()
            }
        }
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string(map)?)?;

        let mut perms = fs::metadata(&tmp)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&tmp, perms)?;

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.put_many(&[(key, value)])
    }

    fn put_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.read_map();
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        self.write_map(&map)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut map = self.read_map();
        for key in keys {
            map.remove(*key);
        }
        self.write_map(&map)
    }
}
