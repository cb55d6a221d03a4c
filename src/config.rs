//! Persisted application configuration.
//!
//! Settings live in a key/value YAML file at a user-scoped path
//! (`~/.pichat/config.yaml` by default). The store is an explicitly
//! constructed instance handed to whoever needs it; there is no
//! process-wide singleton. A missing file and a missing API key are both
//! valid states — the credential check belongs to the caller.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Key under which the API credential is stored.
const API_KEY: &str = "api_key";

/// Key under which the interface language is stored.
const LANGUAGE_KEY: &str = "language";

/// Default interface language code.
const DEFAULT_LANGUAGE: &str = "en";

/// A key/value configuration store persisted to a YAML file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Opens the store at the default user-scoped path.
    ///
    /// The path is `$HOME/.pichat/config.yaml`, falling back to
    /// `./config.yaml` when no home directory can be determined.
    pub fn open_default() -> Self {
        let path = env::var_os("HOME")
            .map(|home| {
                PathBuf::from(home)
                    .join(".pichat")
                    .join("config.yaml")
            })
            .unwrap_or_else(|| PathBuf::from("config.yaml"));
        Self { path }
    }

    /// Opens the store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the value for `key`, or `default` if unset or unreadable.
    pub fn get(&self, key: &str, default: &str) -> String {
        self.load()
            .ok()
            .and_then(|settings| settings.get(key).cloned())
            .unwrap_or_else(|| default.to_string())
    }

    /// Sets `key` to `value` and persists the store.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut settings = self.load().unwrap_or_default();
        settings.insert(key.to_string(), value.to_string());
        self.save(&settings)
    }

    /// Returns the API credential, if one has been configured.
    pub fn api_key(&self) -> Option<String> {
        let key = self.get(API_KEY, "");
        if key.is_empty() { None } else { Some(key) }
    }

    /// Stores the API credential.
    pub fn set_api_key(&self, api_key: &str) -> Result<()> {
        self.set(API_KEY, api_key)
    }

    /// Returns the configured language code, defaulting to `"en"`.
    pub fn language(&self) -> String {
        self.get(LANGUAGE_KEY, DEFAULT_LANGUAGE)
    }

    /// Stores the language code.
    pub fn set_language(&self, language: &str) -> Result<()> {
        self.set(LANGUAGE_KEY, language)
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|err| Error::io("failed to read config file", err))?;
        serde_yaml::from_str(&content)
            .map_err(|err| Error::serialization("failed to parse config file", Some(Box::new(err))))
    }

    fn save(&self, settings: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|err| Error::io("failed to create config directory", err))?;
        }
        let content = serde_yaml::to_string(settings).map_err(|err| {
            Error::serialization("failed to serialize config", Some(Box::new(err)))
        })?;
        fs::write(&self.path, content).map_err(|err| Error::io("failed to write config file", err))
    }
}
