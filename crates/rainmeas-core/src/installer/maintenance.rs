//! Operations on what is already installed.

use std::collections::HashSet;
use std::fs;

use indexmap::IndexMap;
use rainmeas_fs::io;
use rainmeas_registry::VersionSpec;

use super::{CleanReport, Failure, InitOutcome, InstalledPackage, Installer, VerifyReport};
use crate::manifest::Manifest;
use crate::{Error, Result};

impl Installer {
    /// Delete `name`'s directory and manifest entry.
    ///
    /// Packages it depended on stay on disk; see [`clean`](Self::clean).
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let _lock = self.lock()?;
        let target = self.layout.package_dir(name)?;

        let mut manifest = self.manifest.load()?;
        if manifest.remove(name).is_none() {
            return Err(Error::NotInstalled {
                name: name.to_string(),
            });
        }

        if io::remove_dir_if_exists(&target)? {
            tracing::debug!(path = %target.display(), "Removed package directory");
        } else {
            tracing::warn!(package = %name, "Package directory was already absent");
        }
        self.manifest.save(&manifest)?;
        tracing::info!(package = %name, "Removed package");
        Ok(())
    }

    /// Delete module directories nothing in the manifest needs.
    ///
    /// A directory is kept when it is tracked in the manifest or reachable
    /// through the dependency lists of tracked packages, as currently
    /// published by the registry. Hidden entries and plain files are left
    /// alone.
    ///
    /// # Errors
    ///
    /// Fails without deleting anything when the registry cannot answer for
    /// a tracked package. A package the registry does not know counts as
    /// having no dependencies.
    pub fn clean(&mut self) -> Result<CleanReport> {
        let _lock = self.lock()?;
        let mut report = CleanReport::default();
        if !self.layout.modules_dir().is_dir() {
            return Ok(report);
        }

        let manifest = self.manifest.load()?;
        let untracked: Vec<String> = self
            .list_on_disk()?
            .into_iter()
            .filter(|name| !manifest.contains(name))
            .collect();
        if untracked.is_empty() {
            return Ok(report);
        }

        let required = self.required_packages(&manifest)?;
        for name in untracked {
            if required.contains(&name) {
                tracing::debug!(package = %name, "Keeping dependency module");
                report.kept.push(name);
                continue;
            }

            let dir = self.layout.modules_dir().join(&name);
            match io::remove_dir_if_exists(&dir) {
                Ok(_) => {
                    tracing::info!(package = %name, "Removed unused module");
                    report.removed.push(name);
                }
                Err(e) => {
                    let e = Error::from(e);
                    tracing::warn!(package = %name, error = %e, "Failed to remove unused module");
                    report.failed.push(Failure::new(&name, &e));
                }
            }
        }

        Ok(report)
    }

    /// Names reachable from the manifest through registry dependency lists.
    fn required_packages(&self, manifest: &Manifest) -> Result<HashSet<String>> {
        let mut seen = HashSet::new();
        let mut pending: Vec<(String, VersionSpec)> = manifest
            .packages
            .iter()
            .map(|(name, version)| (name.clone(), VersionSpec::parse(version)))
            .collect();

        while let Some((name, spec)) = pending.pop() {
            if !seen.insert(name.clone()) {
                continue;
            }
            let dependencies = self.dependencies_of(&name, &spec).inspect_err(|e| {
                tracing::warn!(package = %name, error = %e, "Could not read dependencies, nothing removed");
            })?;
            pending.extend(
                dependencies
                    .into_iter()
                    .filter(|(dep, _)| !seen.contains(dep))
                    .map(|(dep, dep_spec)| (dep, VersionSpec::parse(&dep_spec))),
            );
        }
        Ok(seen)
    }

    fn dependencies_of(&self, name: &str, spec: &VersionSpec) -> Result<IndexMap<String, String>> {
        let Some(meta) = self.registry.package_info(name)? else {
            return Ok(IndexMap::new());
        };
        let version = match spec {
            VersionSpec::Latest => match self.registry.latest_version(name)? {
                Some(version) => version,
                None => return Ok(IndexMap::new()),
            },
            VersionSpec::Exact(version) => version.clone(),
        };
        Ok(meta.dependencies(&version))
    }

    /// Manifest entries in manifest order.
    pub fn list(&self) -> Result<Vec<InstalledPackage>> {
        Ok(self
            .manifest
            .load()?
            .packages
            .into_iter()
            .map(|(name, version)| InstalledPackage {
                name,
                version,
                explicit: true,
            })
            .collect())
    }

    /// Package directories present under the module root, sorted.
    ///
    /// Includes dependencies that have no manifest entry.
    pub fn list_on_disk(&self) -> Result<Vec<String>> {
        let modules_dir = self.layout.modules_dir();
        let entries = match fs::read_dir(modules_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(modules_dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(modules_dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// Check that every manifest entry has its directory.
    pub fn verify(&self) -> Result<VerifyReport> {
        let mut report = VerifyReport::default();
        for package in self.list()? {
            let present = self
                .layout
                .package_dir(&package.name)
                .map(|dir| dir.is_dir())
                .unwrap_or(false);
            if present {
                report.ok.push(package);
            } else {
                tracing::debug!(package = %package, "Package directory missing");
                report.missing.push(package);
            }
        }
        Ok(report)
    }

    /// Create the module root and an empty manifest where missing.
    ///
    /// An existing manifest is left as it is.
    pub fn init(&self) -> Result<InitOutcome> {
        let modules_dir = self.layout.modules_dir();
        let created_modules_dir = !modules_dir.is_dir();
        fs::create_dir_all(modules_dir).map_err(|e| Error::io(modules_dir, e))?;

        let created_manifest = !self.manifest.exists();
        if created_manifest {
            self.manifest.save(&Manifest::new())?;
        }

        tracing::info!(root = %self.layout.root().display(), "Initialized project");
        Ok(InitOutcome {
            created_modules_dir,
            created_manifest,
        })
    }
}
