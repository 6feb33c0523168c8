//! JSON-backed key-value file.
//!
//! The file holds a single JSON object mapping string keys to string values,
//! the same shape as browser local storage. Values are opaque to this module.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use inkpost_store::StoreError;
use tempfile::NamedTempFile;

use crate::BACKEND;

type Items = BTreeMap<String, String>;

/// Key-value file at a fixed path. A missing or empty file reads as empty.
#[derive(Debug)]
pub(crate) struct KeyValueFile {
    path: PathBuf,
}

impl KeyValueFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Read the value stored under `key`.
    pub(crate) fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    /// Store `value` under `key`, replacing any previous value.
    pub(crate) fn set_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut items = self.load()?;
        items.insert(key.to_owned(), value);
        self.save(&items)
    }

    fn load(&self) -> Result<Items, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Items::new()),
            Err(e) => return Err(self.error(StoreError::io(e))),
        };
        if content.trim().is_empty() {
            return Ok(Items::new());
        }
        serde_json::from_str(&content).map_err(|e| self.error(StoreError::json(e)))
    }

    /// Write all items atomically: temp file in the same directory, then rename.
    fn save(&self, items: &Items) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.error(StoreError::io(e)))?;

        let json = serde_json::to_string_pretty(items).map_err(StoreError::json)?;
        let mut file = NamedTempFile::new_in(dir).map_err(|e| self.error(StoreError::io(e)))?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.write_all(b"\n"))
            .map_err(|e| self.error(StoreError::io(e)))?;
        file.persist(&self.path)
            .map_err(|e| self.error(StoreError::io(e.error)))?;

        tracing::debug!(path = %self.path.display(), keys = items.len(), "Saved key-value file");
        Ok(())
    }

    fn error(&self, err: StoreError) -> StoreError {
        err.with_backend(BACKEND)
            .with_detail(self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_missing_file_reads_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let kv = KeyValueFile::new(temp_dir.path().join("absent.json"));
        assert_eq!(kv.get_item("posts").unwrap(), None);
    }

    #[test]
    fn test_empty_file_reads_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("empty.json");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(KeyValueFile::new(path).get_item("posts").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let temp_dir = tempfile::tempdir().unwrap();
        let kv = KeyValueFile::new(temp_dir.path().join("kv.json"));

        kv.set_item("a", "1".to_owned()).unwrap();
        kv.set_item("b", "2".to_owned()).unwrap();
        kv.set_item("a", "3".to_owned()).unwrap();

        assert_eq!(kv.get_item("a").unwrap().as_deref(), Some("3"));
        assert_eq!(kv.get_item("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/dir/kv.json");
        let kv = KeyValueFile::new(path.clone());

        kv.set_item("k", "v".to_owned()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_is_a_json_object_of_strings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("kv.json");
        KeyValueFile::new(path.clone())
            .set_item("posts", "[]".to_owned())
            .unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "posts": "[]" }));
    }

    #[test]
    fn test_corrupt_file_is_invalid_data() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("kv.json");
        fs::write(&path, "{not json").unwrap();

        let err = KeyValueFile::new(path).get_item("posts").unwrap_err();
        assert_eq!(err.kind, inkpost_store::StoreErrorKind::InvalidData);
        assert_eq!(err.backend, Some("Local"));
    }
}
