//! Credential sources
//!
//! The API key can come from several places. Each place is a [`SecretStore`]
//! and [`resolve_credential`] walks them in priority order, taking the first
//! non-empty value.

use crate::models::Credential;
use crate::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

pub trait SecretStore: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &str;
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads process environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "environment"
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Reads `KEY=value` lines from a dotenv-format secrets file without touching
/// the process environment.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn lookup(&self, key: &str) -> Result<Option<String>> {
        let iter = match dotenvy::from_path_iter(&self.path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        for item in iter {
            let (name, value) = item?;
            if name == key {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

impl SecretStore for FileSecretStore {
    fn name(&self) -> &str {
        "secrets file"
    }

    fn get(&self, key: &str) -> Option<String> {
        match self.lookup(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "Could not read secrets file {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }
}

/// Fixed key/value pairs held in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemorySecretStore {
    values: HashMap<String, String>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl SecretStore for InMemorySecretStore {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// First non-empty value for `key` across `stores`, in order.
pub fn resolve_credential(stores: &[Box<dyn SecretStore>], key: &str) -> Option<Credential> {
    stores.iter().find_map(|store| {
        let credential = store.get(key).and_then(Credential::new);
        match &credential {
            Some(_) => debug!("Resolved {} from {}", key, store.name()),
            None => debug!("{} not set in {}", key, store.name()),
        }
        credential
    })
}
