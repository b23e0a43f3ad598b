use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tenantnav_core::{NavError, NavResult};

use super::KeyValueStore;

/// File-backed store: one JSON object of string entries, written through on
/// every mutation.
///
/// A missing file starts empty. A file that is not a JSON object of strings
/// is reported on open rather than silently discarded.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    pub fn open(path: impl Into<PathBuf>) -> NavResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| NavError::malformed_state(path.display().to_string(), e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(NavError::storage(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_through(&self, entries: &BTreeMap<String, String>) -> NavResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                NavError::storage(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let body = serde_json::to_string_pretty(entries)
            .map_err(|e| NavError::storage(format!("failed to encode store: {e}")))?;

        // Write to a sibling file first so a crash never leaves half a document.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body)
            .map_err(|e| NavError::storage(format!("failed to write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            NavError::storage(format!("failed to replace {}: {e}", self.path.display()))
        })
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> NavResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| NavError::storage("file store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> NavResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| NavError::storage("file store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        self.write_through(&entries)
    }

    fn remove(&self, key: &str) -> NavResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| NavError::storage("file store lock poisoned"))?;
        if entries.remove(key).is_some() {
            self.write_through(&entries)?;
        }
        Ok(())
    }
}
