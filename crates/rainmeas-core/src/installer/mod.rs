//! The installation and dependency resolution engine.
//!
//! [`Installer`] ties the three collaborators together: a
//! [`RegistryClient`] answers what to install, an [`ArchiveTransport`]
//! puts it on disk, and a [`ManifestStore`] remembers what the user asked
//! for. Dependencies are resolved depth-first and every dependency is on
//! disk before the package that needs it is fetched.
//!
//! Mutating operations hold the project's advisory lock for their whole
//! duration.

mod maintenance;
mod report;
mod session;

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use rainmeas_fs::{ProjectLayout, ProjectLock, io};
use rainmeas_registry::{RegistryClient, VersionSpec};

use crate::manifest::{JsonManifestStore, ManifestStore};
use crate::transport::ArchiveTransport;
use crate::{Error, Result};

pub use report::{
    BatchReport, CleanReport, Failure, InitOutcome, InstalledPackage, UpdateOutcome, UpdateReport,
    VerifyReport, VersionChange,
};
pub use session::InstallSession;

/// Installs, updates and removes packages in one project.
pub struct Installer {
    layout: ProjectLayout,
    registry: Box<dyn RegistryClient>,
    transport: Box<dyn ArchiveTransport>,
    manifest: Box<dyn ManifestStore>,
    session: InstallSession,
}

impl Installer {
    pub fn new(
        layout: ProjectLayout,
        registry: Box<dyn RegistryClient>,
        transport: Box<dyn ArchiveTransport>,
        manifest: Box<dyn ManifestStore>,
    ) -> Self {
        Self {
            layout,
            registry,
            transport,
            manifest,
            session: InstallSession::new(),
        }
    }

    /// Installer using the project's `rainmeas-package.json`.
    pub fn for_project(
        layout: ProjectLayout,
        registry: Box<dyn RegistryClient>,
        transport: Box<dyn ArchiveTransport>,
    ) -> Self {
        let manifest = JsonManifestStore::new(layout.manifest_path());
        Self::new(layout, registry, transport, Box::new(manifest))
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn registry(&self) -> &dyn RegistryClient {
        self.registry.as_ref()
    }

    pub fn session(&self) -> &InstallSession {
        &self.session
    }

    /// Start a fresh session, forgetting which packages were processed.
    pub fn begin_session(&mut self) {
        self.session.reset();
    }

    fn lock(&self) -> Result<ProjectLock> {
        Ok(ProjectLock::acquire(self.layout.lock_path())?)
    }

    /// Install `name` and its dependencies in a fresh session.
    ///
    /// Returns every package placed on disk, dependencies first and the
    /// requested package last. Only the requested package is recorded in
    /// the manifest.
    pub fn install(&mut self, name: &str, spec: &VersionSpec) -> Result<Vec<InstalledPackage>> {
        let _lock = self.lock()?;
        self.session.reset();
        self.install_recursive(name, spec, false)?;
        Ok(self.session.installed().to_vec())
    }

    /// Install `name` within the current session.
    ///
    /// Returns `None` when the session already processed `name`, in which
    /// case nothing is fetched or written.
    pub fn install_package(
        &mut self,
        name: &str,
        spec: &VersionSpec,
    ) -> Result<Option<InstalledPackage>> {
        let _lock = self.lock()?;
        self.install_recursive(name, spec, false)
    }

    /// Install every entry of `entries` in one session, in order.
    ///
    /// A failing entry is reported and the batch moves on.
    pub fn install_all(&mut self, entries: &IndexMap<String, String>) -> Result<BatchReport> {
        let _lock = self.lock()?;
        self.session.reset();
        for (name, spec) in entries {
            self.session.pin(name, VersionSpec::parse(spec));
        }

        let mut report = BatchReport::default();
        for (name, spec) in entries {
            match self.install_recursive(name, &VersionSpec::parse(spec), false) {
                Ok(_) => report.succeeded.push(name.clone()),
                Err(e) => {
                    tracing::warn!(package = %name, error = %e, "Install failed, continuing");
                    report.failed.push(Failure::new(name, &e));
                }
            }
        }
        report.installed = self.session.installed().to_vec();
        Ok(report)
    }

    /// Install every entry of the manifest.
    pub fn install_from_manifest(&mut self) -> Result<BatchReport> {
        let entries = self.manifest.load()?.packages;
        self.install_all(&entries)
    }

    fn install_recursive(
        &mut self,
        name: &str,
        spec: &VersionSpec,
        is_dependency: bool,
    ) -> Result<Option<InstalledPackage>> {
        if self.session.is_visited(name) {
            tracing::debug!(package = %name, "Already processed in this session");
            return Ok(None);
        }
        let target = self.layout.package_dir(name)?;

        // A batch entry reached as a dependency installs at its own spec.
        let spec = match self.session.pinned_spec(name) {
            Some(own) if is_dependency => {
                if own != spec {
                    tracing::warn!(
                        package = %name,
                        requested = ?own,
                        required = ?spec,
                        "Dependency spec overridden by explicit request"
                    );
                }
                own.clone()
            }
            _ => spec.clone(),
        };

        let meta = self
            .registry
            .package_info(name)?
            .ok_or_else(|| Error::PackageNotFound {
                name: name.to_string(),
            })?;

        let version = match &spec {
            VersionSpec::Latest => self.registry.latest_version(name)?.ok_or_else(|| {
                Error::NoLatestVersion {
                    name: name.to_string(),
                }
            })?,
            VersionSpec::Exact(version) => version.clone(),
        };

        if !meta.has_version(&version) {
            return Err(Error::VersionNotFound {
                name: name.to_string(),
                available: meta.available_versions(),
                version,
            });
        }

        let locator = self
            .registry
            .download_locator(name, &version)?
            .ok_or_else(|| Error::MissingDownload {
                name: name.to_string(),
                version: version.clone(),
            })?;
        tracing::debug!(package = %name, %version, %locator, "Resolved package");

        // Marked before descending so a cycle back to `name` short-circuits.
        self.session.visit(name);
        let dependencies = meta.dependencies(&version);
        let result = self.install_resolved(
            name,
            &version,
            &locator,
            &dependencies,
            is_dependency,
            &target,
        );
        if result.is_err() {
            self.session.forget(name);
        }
        result.map(Some)
    }

    fn install_resolved(
        &mut self,
        name: &str,
        version: &str,
        locator: &str,
        dependencies: &IndexMap<String, String>,
        is_dependency: bool,
        target: &Path,
    ) -> Result<InstalledPackage> {
        for (dependency, dep_spec) in dependencies {
            tracing::debug!(package = %name, %dependency, spec = %dep_spec, "Installing dependency");
            self.install_recursive(dependency, &VersionSpec::parse(dep_spec), true)
                .map_err(|source| Error::DependencyFailed {
                    package: name.to_string(),
                    dependency: dependency.clone(),
                    source: Box::new(source),
                })?;
        }

        if !is_dependency {
            self.session.request(name);
        }
        let explicit = self.session.is_explicitly_requested(name);

        let modules_dir = self.layout.modules_dir();
        fs::create_dir_all(modules_dir).map_err(|e| Error::io(modules_dir, e))?;

        let staging = tempfile::Builder::new()
            .prefix(&format!(".staging-{name}-"))
            .tempdir_in(modules_dir)
            .map_err(|e| Error::io(modules_dir, e))?;
        let staged = staging.path().join(name);

        self.transport.fetch_and_extract(locator, &staged)?;

        io::remove_dir_if_exists(target)?;
        fs::rename(&staged, target).map_err(|e| Error::io(target, e))?;
        drop(staging);

        if explicit {
            let mut manifest = self.manifest.load()?;
            manifest.insert(name, version);
            self.manifest.save(&manifest)?;
        }

        let package = InstalledPackage {
            name: name.to_string(),
            version: version.to_string(),
            explicit,
        };
        tracing::info!(package = %package, explicit = package.explicit, "Installed package");
        self.session.record(package.clone());
        Ok(package)
    }

    /// Move `name` to the registry's latest version.
    ///
    /// The installed copy is only replaced once the new archive has been
    /// fetched and unpacked, so a failed update leaves it untouched.
    pub fn update(&mut self, name: &str) -> Result<UpdateOutcome> {
        let _lock = self.lock()?;
        self.update_locked(name)
    }

    /// Update every manifest entry, continuing past failures.
    pub fn update_all(&mut self) -> Result<UpdateReport> {
        let _lock = self.lock()?;
        let manifest = self.manifest.load()?;

        let mut report = UpdateReport::default();
        for name in manifest.packages.keys() {
            match self.update_locked(name) {
                Ok(UpdateOutcome::Updated(change)) => report.updated.push(change),
                Ok(UpdateOutcome::UpToDate { name, .. }) => report.up_to_date.push(name),
                Err(e) => {
                    tracing::warn!(package = %name, error = %e, "Update failed, continuing");
                    report.failed.push(Failure::new(name, &e));
                }
            }
        }
        Ok(report)
    }

    fn update_locked(&mut self, name: &str) -> Result<UpdateOutcome> {
        let manifest = self.manifest.load()?;
        let current = manifest
            .version_of(name)
            .ok_or_else(|| Error::NotInstalled {
                name: name.to_string(),
            })?
            .to_string();

        let latest = self
            .registry
            .latest_version(name)?
            .ok_or_else(|| Error::NoLatestVersion {
                name: name.to_string(),
            })?;

        if current == latest {
            tracing::debug!(package = %name, version = %current, "Already at latest version");
            return Ok(UpdateOutcome::UpToDate {
                name: name.to_string(),
                version: current,
            });
        }

        self.session.reset();
        self.install_recursive(name, &VersionSpec::Exact(latest.clone()), false)?;
        tracing::info!(package = %name, from = %current, to = %latest, "Updated package");
        Ok(UpdateOutcome::Updated(VersionChange {
            name: name.to_string(),
            from: current,
            to: latest,
        }))
    }
}
