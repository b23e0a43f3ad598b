use std::collections::HashMap;
use std::sync::RwLock;

use tenantnav_core::{NavError, NavResult};

use super::KeyValueStore;

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with initial entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> NavResult<Option<String>> {
        let map = self
            .inner
            .read()
            .map_err(|_| NavError::storage("in-memory store lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> NavResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| NavError::storage("in-memory store lock poisoned"))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> NavResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| NavError::storage("in-memory store lock poisoned"))?;
        map.remove(key);
        Ok(())
    }
}
