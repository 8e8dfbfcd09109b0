//! A [`KvStore`] persisted as a single JSON document.
//!
//! The whole store is rewritten on every commit: the snapshot is written
//! to a sibling `.tmp` file and then renamed over the state file, so a
//! crash mid-write leaves the previous snapshot intact.
//!
//! # File format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": [
//!     { "scope": "Global", "field": "PoolA", "value": "120" },
//!     { "scope": { "Character": "Rin" }, "field": "Level", "value": 3 }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use reservoir_core::store::{Field, Scope};
use reservoir_core::{KvStore, StoreError, StoreKey};

use crate::error::DbError;

/// Format version written to and accepted from disk.
pub const FORMAT_VERSION: u32 = 1;

/// One stored value.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    scope: Scope,
    field: Field,
    value: Value,
}

/// On-disk document.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    entries: Vec<Entry>,
}

/// JSON-file-backed store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    committed: BTreeMap<StoreKey, Value>,
    staged: BTreeMap<StoreKey, Value>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading it if the file exists.
    ///
    /// A missing file is an empty store; it is created on the first commit.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file exists but cannot be read or parsed,
    /// or was written by another format version.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DbError> {
        let path = path.into();
        let committed = if path.exists() {
            load(&path)?
        } else {
            BTreeMap::new()
        };
        info!(path = %path.display(), entries = committed.len(), "State file opened");
        Ok(Self {
            path,
            committed,
            staged: BTreeMap::new(),
        })
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of committed values.
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// Whether nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Write `entries` to disk atomically.
    fn flush(&self, entries: &BTreeMap<StoreKey, Value>) -> Result<(), DbError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| DbError::io(parent, err))?;
        }

        let snapshot = Snapshot {
            version: FORMAT_VERSION,
            entries: entries
                .iter()
                .map(|(key, value)| Entry {
                    scope: key.scope.clone(),
                    field: key.field,
                    value: value.clone(),
                })
                .collect(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|err| DbError::io(&tmp, err))?;
        fs::rename(&tmp, &self.path).map_err(|err| DbError::io(&self.path, err))?;
        Ok(())
    }
}

fn load(path: &Path) -> Result<BTreeMap<StoreKey, Value>, DbError> {
    let bytes = fs::read(path).map_err(|err| DbError::io(path, err))?;
    let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
    if snapshot.version != FORMAT_VERSION {
        return Err(DbError::UnsupportedVersion {
            found: snapshot.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(snapshot
        .entries
        .into_iter()
        .map(|entry| {
            (
                StoreKey {
                    scope: entry.scope,
                    field: entry.field,
                },
                entry.value,
            )
        })
        .collect())
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &StoreKey) -> Result<Option<Value>, StoreError> {
        Ok(self
            .staged
            .get(key)
            .or_else(|| self.committed.get(key))
            .cloned())
    }

    fn set(&mut self, key: StoreKey, value: Value) -> Result<(), StoreError> {
        self.staged.insert(key, value);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if self.staged.is_empty() {
            return Ok(());
        }
        let mut next = self.committed.clone();
        next.extend(self.staged.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.flush(&next)?;

        debug!(path = %self.path.display(), written = self.staged.len(), "State committed");
        self.committed = next;
        self.staged.clear();
        Ok(())
    }

    fn discard(&mut self) {
        self.staged.clear();
    }
}
