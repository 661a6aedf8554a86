use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

/// Key under which the global vote table is persisted.
pub const VOTES_KEY: &str = "allVotes";
/// Key under which the last authenticated user is persisted.
pub const SESSION_KEY: &str = "currentUser";

/// Durable key-value boundary holding JSON blobs.
pub trait Storage {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, blob: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

pub fn load_json<T: DeserializeOwned>(storage: &impl Storage, key: &str) -> Result<Option<T>> {
    storage.load(key)?
        .map(|blob| serde_json::from_str(&blob).map_err(|e| Error::corrupt(key, e)))
        .transpose()
}

pub fn save_json<T: Serialize>(storage: &mut impl Storage, key: &str, value: &T) -> Result<()> {
    let blob = serde_json::to_string(value)
        .map_err(|e| Error::storage(format!("Failed to encode '{key}'"), e))?;
    storage.save(key, &blob)
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(mut self, key: impl Into<String>, blob: impl Into<String>) -> Self {
        self.blobs.insert(key.into(), blob.into());
        self
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.blobs.remove(key);
        Ok(())
    }
}
