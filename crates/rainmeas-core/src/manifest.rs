//! The project manifest (`rainmeas-package.json`).
//!
//! The manifest records only packages the user asked for by name, mapped to
//! the version that was installed. Dependencies pulled in on their behalf
//! live on disk but never appear here.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rainmeas_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// In-memory form of the manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Package name to installed version, in insertion order.
    #[serde(default)]
    pub packages: IndexMap<String, String>,

    /// Top-level keys rainmeas does not use, kept so hand edits survive a save.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.packages.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Record `name` at `version`, keeping its position if already present.
    pub fn insert(&mut self, name: &str, version: &str) -> Option<String> {
        self.packages.insert(name.to_string(), version.to_string())
    }

    /// Drop `name`, preserving the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.packages.shift_remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }
}

/// Whole-document persistence of the [`Manifest`].
pub trait ManifestStore {
    /// Load the manifest; a missing document yields an empty manifest.
    fn load(&self) -> Result<Manifest>;

    /// Replace the stored document with `manifest`.
    fn save(&self, manifest: &Manifest) -> Result<()>;

    /// Whether a document exists yet.
    fn exists(&self) -> bool;
}

/// [`ManifestStore`] backed by a JSON file, written atomically.
#[derive(Debug, Clone)]
pub struct JsonManifestStore {
    path: PathBuf,
    store: ConfigStore,
}

impl JsonManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            store: ConfigStore::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ManifestStore for JsonManifestStore {
    fn load(&self) -> Result<Manifest> {
        match self.store.load_if_exists::<Manifest>(&self.path) {
            Ok(Some(manifest)) => Ok(manifest),
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "No manifest yet, starting empty");
                Ok(Manifest::new())
            }
            Err(rainmeas_fs::Error::ConfigParse { path, message, .. }) => {
                Err(Error::ManifestParse { path, message })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, manifest: &Manifest) -> Result<()> {
        self.store.save(&self.path, manifest)?;
        tracing::debug!(path = %self.path.display(), entries = manifest.len(), "Saved manifest");
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }
}
