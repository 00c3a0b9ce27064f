//! Persisted local state
//!
//! A small JSON key-value file standing in for the browser's local storage.
//! It is read once at startup and rewritten in full on every explicit
//! change; writes are serialized by the single-threaded caller, so
//! last-write-wins is sufficient.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::session::LoginUser;

/// Store key holding the saved file records
pub const FILES_KEY: &str = "files";
/// Store key holding the last login identity
pub const LOGIN_KEY: &str = "files:login";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no home directory available for the default store location")]
    NoProjectDirs,
}

/// A successfully uploaded and pinned file, as kept in the saved list
///
/// Field names on the wire match the gateway response plus the two endpoint
/// URLs the upload used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaveFile {
    pub hash: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub up_endpoint: String,
    pub pin_endpoint: String,
}

/// JSON-file-backed key-value store
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Store {
    /// Open a store at an explicit path, creating an empty one if the file
    /// does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    /// Open the store at its default per-user location
    pub fn open_default() -> Result<Self, StoreError> {
        let dirs = directories::ProjectDirs::from("network", "crust", "crustfiles")
            .ok_or(StoreError::NoProjectDirs)?;
        let dir = dirs.data_dir();
        fs::create_dir_all(dir)?;
        Self::open(dir.join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a value by key, returning `None` when absent or undecodable
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Set a value and persist the whole store
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        self.values
            .insert(key.to_string(), serde_json::to_value(value)?);
        self.flush()
    }

    /// Remove a key and persist the whole store
    pub fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&self.values)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    /// The persisted login identity, if any
    pub fn login(&self) -> Option<LoginUser> {
        self.get(LOGIN_KEY)
    }

    pub fn set_login(&mut self, user: &LoginUser) -> Result<(), StoreError> {
        self.set(LOGIN_KEY, user)
    }

    pub fn clear_login(&mut self) -> Result<(), StoreError> {
        self.remove(LOGIN_KEY)
    }

    /// The saved file list, empty when nothing has been stored yet
    pub fn files(&self) -> Vec<SaveFile> {
        self.get(FILES_KEY).unwrap_or_default()
    }

    pub fn set_files(&mut self, files: &[SaveFile]) -> Result<(), StoreError> {
        self.set(FILES_KEY, &files)
    }
}
