//! Pluggable key-value backends.
//!
//! The store is defined over a tiny string-keyed blob interface so tests
//! run against an in-memory map while the CLI persists JSON files on disk.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StoreError;

/// A string-keyed blob backend. Values are opaque to the backend; the
/// store layers JSON on top.
pub trait KvBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// On-disk backend: one `<key>.json` file per key inside a data
/// directory, created on first write.
#[derive(Debug)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvBackend for JsonFileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Write-then-rename so a crash mid-write never truncates the
        // previous value.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_round_trip() {
        let backend = MemoryBackend::new();
        assert!(backend.get("missing").unwrap().is_none());
        backend.put("k", "v1").unwrap();
        backend.put("k", "v2").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path());
        assert!(backend.get("studySets").unwrap().is_none());
        backend.put("studySets", "[]").unwrap();
        assert_eq!(backend.get("studySets").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("studySets.json").exists());
    }

    #[test]
    fn file_backend_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("buzzdeck");
        let backend = JsonFileBackend::new(&nested);
        backend.put("userRating", "1000").unwrap();
        assert_eq!(backend.get("userRating").unwrap().as_deref(), Some("1000"));
    }
}
