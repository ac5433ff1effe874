//! The read-only registry interface used by the installer.

use crate::Result;
use crate::model::{PackageMetadata, RegistryIndex};

/// Read-only view of a package registry.
///
/// Implementations must answer consistently for the lifetime of one
/// command; callers may query the same package several times.
pub trait RegistryClient {
    /// Full metadata of `name`, or `None` when the registry has no such package.
    fn package_info(&self, name: &str) -> Result<Option<PackageMetadata>>;

    /// Newest version of `name`, or `None` when it cannot be determined.
    fn latest_version(&self, name: &str) -> Result<Option<String>>;

    /// Concrete versions of `name`, ascending. Empty for unknown packages.
    fn available_versions(&self, name: &str) -> Result<Vec<String>> {
        Ok(self
            .package_info(name)?
            .map(|meta| meta.available_versions())
            .unwrap_or_default())
    }

    /// Download locator for `name@version`, resolved so the transport can
    /// use it directly.
    fn download_locator(&self, name: &str, version: &str) -> Result<Option<String>>;

    /// Packages whose name, description or author contains `query`,
    /// case-insensitively.
    fn search(&self, query: &str) -> Result<RegistryIndex>;

    /// Every package in the registry index.
    fn list_all(&self) -> Result<RegistryIndex>;
}
