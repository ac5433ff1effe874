//! Constants for the rainmeas project layout.

use std::path::Path;

/// Well-known paths inside a Rainmeter skin project, relative to its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPath {
    /// The module root holding one directory per installed package
    ModulesDir,
    /// The package manifest (`rainmeas-package.json`)
    ManifestFile,
    /// Advisory lock file guarding mutating commands
    LockFile,
}

impl ProjectPath {
    /// Get the path relative to the project root, using forward slashes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModulesDir => "@Resources/@rainmeas-modules",
            Self::ManifestFile => "rainmeas-package.json",
            Self::LockFile => "@Resources/.rainmeas.lock",
        }
    }
}

impl AsRef<Path> for ProjectPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
