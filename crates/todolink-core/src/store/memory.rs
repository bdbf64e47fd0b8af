//! In-memory credential store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::Result;
use crate::store::StorageKey;
use crate::traits::CredentialStore;

/// A process-local [`CredentialStore`] backed by a locked map.
///
/// Nothing survives the process; useful for tests and for embedders that
/// persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `values`.
    pub fn with_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (StorageKey, V)>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(values.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Option<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.get(&key).cloned()
    }

    fn get_many(&self, keys: &[StorageKey]) -> Vec<Option<String>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        keys.iter().map(|key| values.get(key).cloned()).collect()
    }

    fn write_batch(&self, writes: &[(StorageKey, Option<&str>)]) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in writes {
            match value {
                Some(value) => {
                    values.insert(*key, (*value).to_string());
                }
                None => {
                    values.remove(key);
                }
            }
        }
        Ok(())
    }
}
