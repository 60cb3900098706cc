//! Per-scenario persistence of the last submitted form values.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::defaults::Defaults;
use crate::request::FormValues;
use crate::scenario::Scenario;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("serializing form values: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key -> string value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io { path: self.dir.clone(), source })?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| StoreError::Io { path, source })
    }
}

pub fn storage_key(scenario: Scenario) -> String {
    format!("{}{}", Defaults::STORAGE_KEY_PREFIX, scenario.id())
}

pub struct FormStateStore<S> {
    backend: S,
}

impl<S: KeyValueStore> FormStateStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Overwrites any earlier snapshot for `scenario`.
    pub fn save(&mut self, scenario: Scenario, values: &FormValues) -> Result<(), StoreError> {
        let json = serde_json::to_string(values)?;
        self.backend.set(&storage_key(scenario), &json)
    }

    /// Missing, unreadable or malformed snapshots all come back as `None`.
    pub fn load(&self, scenario: Scenario) -> Option<FormValues> {
        let key = storage_key(scenario);
        let raw = match self.backend.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(%key, error = %e, "could not read saved form values");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(values) => Some(values),
            Err(e) => {
                warn!(%key, error = %e, "ignoring malformed saved form values");
                None
            }
        }
    }
}
