//! Package registry client for rainmeas.
//!
//! The registry is a tree of JSON documents:
//!
//! ```text
//! <registry>/
//!   index.json              # name -> { latest, description, author }
//!   packages/
//!     weatherwidget.json    # full metadata, one document per package
//! ```
//!
//! It can be served from a local directory or over HTTP. The
//! [`RegistryClient`] trait is the read-only seam the installer depends on;
//! [`JsonRegistry`] is the adapter over either source.

pub mod client;
pub mod error;
pub mod json;
pub mod model;
pub mod source;
pub mod version;

use std::time::Duration;

pub use client::RegistryClient;
pub use error::{Error, Result};
pub use json::JsonRegistry;
pub use model::{PackageMetadata, PackageSummary, RegistryIndex, VersionEntry, VersionRecord};
pub use source::{DirectorySource, DocumentSource, HttpSource};
pub use version::{VersionSpec, compare_versions, sort_versions};

/// Default registry used when nothing else is configured.
pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/rainmeas/rainmeas-registry/main/";

/// Open the registry at `location`.
///
/// `http://` and `https://` locations are fetched over the network with the
/// given request timeout. `file://` URLs and plain paths are read from disk.
pub fn open(location: &str, timeout: Duration) -> Result<Box<dyn RegistryClient>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let source = HttpSource::new(location, timeout)?;
        Ok(Box::new(JsonRegistry::new(source)))
    } else {
        let path = location.strip_prefix("file://").unwrap_or(location);
        if path.is_empty() {
            return Err(Error::InvalidLocation {
                location: location.to_string(),
                reason: "empty path".to_string(),
            });
        }
        Ok(Box::new(JsonRegistry::new(DirectorySource::new(path))))
    }
}
