//! Durable key/value storage abstractions.
//!
//! Mirrors browser-style client storage: string keys, string values,
//! synchronous and local. Typed access lives in `crate::persisted`.

mod file;
mod in_memory;

use std::sync::Arc;

use tenantnav_core::NavResult;

pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> NavResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> NavResult<()>;
    fn remove(&self, key: &str) -> NavResult<()>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> NavResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> NavResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> NavResult<()> {
        (**self).remove(key)
    }
}
