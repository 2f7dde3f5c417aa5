use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Key-value persistence for view state. Everything lives in one JSON file;
/// each mutation writes the whole map back so state survives a crash.
pub struct StateStore {
    path: Option<PathBuf>,
    values: HashMap<String, serde_json::Value>,
}

impl StateStore {
    /// Open the store at the given path, or the default platform config
    /// location. A missing or unreadable file starts empty.
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => default_state_path()?,
        };
        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(values) => values,
                Err(err) => {
                    warn!(path = %path.display(), %err, "discarding malformed state file");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: HashMap::new(),
        }
    }

    /// Read a value. A missing key or one that no longer deserializes into
    /// `T` yields `None`, so callers fall back to defaults.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "ignoring malformed persisted value");
                None
            }
        }
    }

    /// Write a value and flush the file. Serialization of local state types
    /// cannot fail; disk errors are logged and the in-memory copy stays
    /// authoritative.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, %err, "failed to serialize state value");
                return;
            }
        };
        self.values.insert(key.to_string(), value);
        if let Err(err) = self.flush() {
            warn!(key, %err, "failed to persist state");
        }
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(&self.values)?;
        fs::write(path, raw).with_context(|| format!("writing {}", path.display()))
    }
}

fn default_state_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("no config directory on this platform")?;
    Ok(base.join("system-atlas").join("state.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FilterState, ViewportState};

    #[test]
    fn set_then_get_round_trips() {
        let mut store = StateStore::in_memory();
        let state = ViewportState {
            scale: 1.4,
            origin_x: -20.0,
            origin_y: 35.0,
        };
        store.set("full.viewport", &state);
        assert_eq!(store.get::<ViewportState>("full.viewport"), Some(state));
    }

    #[test]
    fn missing_key_yields_none() {
        let store = StateStore::in_memory();
        assert_eq!(store.get::<FilterState>("flow.filter"), None);
    }

    #[test]
    fn malformed_value_yields_none() {
        let mut store = StateStore::in_memory();
        store.set("full.viewport", &"not a viewport");
        assert_eq!(store.get::<ViewportState>("full.viewport"), None);
    }

    #[test]
    fn malformed_file_starts_empty() {
        let dir = std::env::temp_dir().join("system-atlas-test-store");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        fs::write(&path, "{ this is not json").unwrap();

        let store = StateStore::open(Some(path.clone())).unwrap();
        assert_eq!(store.get::<ViewportState>("full.viewport"), None);
        fs::remove_file(path).ok();
    }

    #[test]
    fn values_survive_reopen() {
        let dir = std::env::temp_dir().join("system-atlas-test-store");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("reopen.json");
        fs::remove_file(&path).ok();

        let mut store = StateStore::open(Some(path.clone())).unwrap();
        store.set("pipeline.collapsed", &vec!["ingest".to_string()]);
        drop(store);

        let store = StateStore::open(Some(path.clone())).unwrap();
        assert_eq!(
            store.get::<Vec<String>>("pipeline.collapsed"),
            Some(vec!["ingest".to_string()])
        );
        fs::remove_file(path).ok();
    }
}
