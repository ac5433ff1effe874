//! Project layout resolution
//!
//! A [`ProjectLayout`] is computed once per invocation and passed explicitly
//! to every component that touches the project on disk.

use std::path::{Path, PathBuf};

use crate::{Error, ProjectPath, Result, validate_path_component};

/// Resolved locations of everything rainmeas reads or writes in a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    modules_dir: PathBuf,
    manifest_path: PathBuf,
    lock_path: PathBuf,
}

impl ProjectLayout {
    /// Build the layout for a project rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            modules_dir: root.join(ProjectPath::ModulesDir),
            manifest_path: root.join(ProjectPath::ManifestFile),
            lock_path: root.join(ProjectPath::LockFile),
            root,
        }
    }

    /// Find the project that contains `start`.
    ///
    /// Walks up from `start` looking for a manifest file, like `git` does for
    /// `.git`. When no ancestor has one, `start` itself becomes the root so
    /// that `init` and first-time installs work in a fresh directory.
    pub fn discover(start: &Path) -> Result<Self> {
        let start = dunce::canonicalize(start).map_err(|e| Error::io(start, e))?;

        let mut current = Some(start.as_path());
        while let Some(dir) = current {
            if dir.join(ProjectPath::ManifestFile).is_file() {
                tracing::debug!(root = %dir.display(), "Found project manifest");
                return Ok(Self::new(dir));
            }
            current = dir.parent();
        }

        tracing::debug!(root = %start.display(), "No manifest found, using start directory");
        Ok(Self::new(start))
    }

    /// The project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The module root holding one directory per package.
    pub fn modules_dir(&self) -> &Path {
        &self.modules_dir
    }

    /// Path of the package manifest.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Path of the advisory lock file.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Directory for package `name` under the module root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if `name` is not a single safe path
    /// component.
    pub fn package_dir(&self, name: &str) -> Result<PathBuf> {
        validate_path_component(name)?;
        Ok(self.modules_dir.join(name))
    }
}
