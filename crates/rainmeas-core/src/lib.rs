//! Installation engine for rainmeas
//!
//! This crate resolves packages against a registry, installs their
//! dependency closure into the project's module root and keeps the
//! manifest of explicitly requested packages:
//!
//! - **Installer**: install, install-all, update, remove, clean and verify
//! - **Manifest store**: whole-document persistence of `rainmeas-package.json`
//! - **Archive transport**: fetch-and-unpack of zip archives
//!
//! # Architecture
//!
//! ```text
//!                 rainmeas-cli
//!                      |
//!                rainmeas-core
//!                 /          \
//!   rainmeas-registry     rainmeas-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use rainmeas_core::{Installer, ZipTransport};
//! use rainmeas_fs::ProjectLayout;
//! use rainmeas_registry::VersionSpec;
//!
//! fn example() -> rainmeas_core::Result<()> {
//!     let timeout = Duration::from_secs(60);
//!     let registry = rainmeas_registry::open("/srv/rainmeas-registry", timeout)?;
//!     let transport = ZipTransport::new(timeout)?;
//!     let layout = ProjectLayout::discover(std::path::Path::new("."))?;
//!
//!     let mut installer = Installer::for_project(layout, registry, Box::new(transport));
//!     for package in installer.install("weatherwidget", &VersionSpec::Latest)? {
//!         println!("installed {package}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod installer;
pub mod manifest;
pub mod transport;

pub use error::{Error, Result};
pub use installer::{
    BatchReport, CleanReport, Failure, InitOutcome, InstallSession, InstalledPackage, Installer,
    UpdateOutcome, UpdateReport, VerifyReport, VersionChange,
};
pub use manifest::{JsonManifestStore, Manifest, ManifestStore};
pub use transport::{ArchiveTransport, ZipTransport};
