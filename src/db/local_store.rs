// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! String key/value store persisted to a JSON file.
//!
//! The client's stand-in for browser `localStorage`: the sync cooldown markers
//! and the legacy cached user live here.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::db::cookies::write_json;
use crate::error::AppError;
use crate::models::StravaUser;

/// Key of the legacy cached-user entry.
pub const CACHED_USER_KEY: &str = "strava_user";

/// Persisted string key/value store.
#[derive(Debug, Default)]
pub struct LocalStore {
    entries: Mutex<BTreeMap<String, String>>,
    path: Option<PathBuf>,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store persisted at `path`, starting empty if the file is absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).map_err(|e| {
                AppError::Storage(format!("Corrupt local storage {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read local storage {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            entries: Mutex::new(entries),
            path: Some(path),
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        write_json(path, entries).map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

/// Legacy cached user, kept independently of the auth store.
///
/// Storage failures are logged and swallowed: the cache is a convenience and
/// never blocks the session flow.
#[derive(Debug, Clone, Copy)]
pub struct CachedUserStore<'a> {
    store: &'a LocalStore,
}

impl<'a> CachedUserStore<'a> {
    pub fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Load the cached user. A corrupt entry is treated as absent.
    pub fn load(&self) -> Option<StravaUser> {
        let raw = self.store.get(CACHED_USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load cached user");
                None
            }
        }
    }

    pub fn save(&self, user: &StravaUser) {
        let result = serde_json::to_string(user)
            .map_err(|e| AppError::Storage(e.to_string()))
            .and_then(|raw| self.store.set(CACHED_USER_KEY, &raw));

        if let Err(e) = result {
            tracing::error!(error = %e, "Failed to save cached user");
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(CACHED_USER_KEY) {
            tracing::error!(error = %e, "Failed to remove cached user");
        }
    }
}
