//! Error types for rainmeas-core

use std::path::PathBuf;

/// Result type for rainmeas-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rainmeas-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The registry has no package with this name
    #[error("Package '{name}' not found in registry")]
    PackageNotFound { name: String },

    /// The requested version is not published
    #[error(
        "Version '{version}' not found for package '{name}' (available: {})",
        list_versions(.available)
    )]
    VersionNotFound {
        name: String,
        version: String,
        available: Vec<String>,
    },

    #[error("Could not determine latest version for package '{name}'")]
    NoLatestVersion { name: String },

    #[error("No download location for {name}@{version}")]
    MissingDownload { name: String, version: String },

    /// A dependency failed, so its dependent was never fetched
    #[error("Dependency '{dependency}' of '{package}' failed: {source}")]
    DependencyFailed {
        package: String,
        dependency: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to fetch {locator}: {message}")]
    Transport { locator: String, message: String },

    #[error("Failed to extract {archive}: {message}")]
    Extract { archive: PathBuf, message: String },

    #[error("Manifest at {path} is malformed: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// The manifest has no entry for this package
    #[error("Package '{name}' is not installed")]
    NotInstalled { name: String },

    #[error("Invalid package name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Registry error from rainmeas-registry
    #[error(transparent)]
    Registry(#[from] rainmeas_registry::Error),

    /// Filesystem error from rainmeas-fs
    #[error(transparent)]
    Fs(rainmeas_fs::Error),
}

fn list_versions(versions: &[String]) -> String {
    if versions.is_empty() {
        "none".to_string()
    } else {
        versions.join(", ")
    }
}

impl From<rainmeas_fs::Error> for Error {
    fn from(err: rainmeas_fs::Error) -> Self {
        match err {
            rainmeas_fs::Error::InvalidName { name, reason } => Self::InvalidName { name, reason },
            other => Self::Fs(other),
        }
    }
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Fs(rainmeas_fs::Error::io(path, source))
    }

    /// The innermost error, following dependency failures down the chain.
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::DependencyFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
