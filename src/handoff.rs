//! One-shot JSON message channel between pages and commands.
//!
//! A producer writes a blob under a key; the next consumer reads it and
//! the entry is deleted in the same call. There is no schema versioning.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{GridError, Result};

/// Key carrying a node freshly submitted on the ingestion page.
pub const INGESTED_NODE_KEY: &str = "gridmind-ingested-node";
/// Key carrying the asset the grid page wants diagnosed.
pub const DIAGNOSTIC_TARGET_KEY: &str = "gridmind-diagnostic-target";

/// Storage backing a [`Handoff`] channel.
#[derive(Debug, Clone)]
enum Backend {
    Memory(HashMap<String, String>),
    Dir(PathBuf),
}

/// Read-once key/value channel.
#[derive(Debug, Clone)]
pub struct Handoff {
    backend: Backend,
}

fn check_key(key: &str) -> Result<()> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(GridError::InvalidKey(key.to_string()))
    }
}

impl Handoff {
    /// Channel held in memory for the lifetime of the value.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(HashMap::new()),
        }
    }

    /// Channel stored as `<key>.json` files under `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be created.
    pub fn in_dir(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            backend: Backend::Dir(dir.to_path_buf()),
        })
    }

    /// Writes `value` under `key`, replacing any unread value.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed key or on serialization/I/O failure.
    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        check_key(key)?;
        let blob = serde_json::to_string(value)?;
        match &mut self.backend {
            Backend::Memory(map) => {
                map.insert(key.to_string(), blob);
            }
            Backend::Dir(dir) => fs::write(dir.join(format!("{key}.json")), blob)?,
        }
        debug!(key, "handoff written");
        Ok(())
    }

    /// Reads and deletes the value under `key`.
    ///
    /// The entry is removed even when it fails to parse.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed key, on I/O failure or when the
    /// stored blob does not deserialize into `T`.
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        check_key(key)?;
        let blob = match &mut self.backend {
            Backend::Memory(map) => map.remove(key),
            Backend::Dir(dir) => {
                let path = dir.join(format!("{key}.json"));
                match fs::read_to_string(&path) {
                    Ok(s) => {
                        fs::remove_file(&path)?;
                        Some(s)
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => None,
                    Err(e) => return Err(e.into()),
                }
            }
        };
        let Some(blob) = blob else {
            return Ok(None);
        };
        debug!(key, "handoff consumed");
        Ok(Some(serde_json::from_str(&blob)?))
    }

    /// Whether an unread value exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        if check_key(key).is_err() {
            return false;
        }
        match &self.backend {
            Backend::Memory(map) => map.contains_key(key),
            Backend::Dir(dir) => dir.join(format!("{key}.json")).is_file(),
        }
    }
}
