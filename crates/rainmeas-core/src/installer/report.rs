//! Results returned by installer operations for the caller to present.

use std::fmt;

/// A package placed on disk during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
    /// Requested by the user rather than pulled in as a dependency.
    pub explicit: bool,
}

impl fmt::Display for InstalledPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// One item of a batch operation that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub name: String,
    pub message: String,
}

impl Failure {
    pub(crate) fn new(name: &str, error: &crate::Error) -> Self {
        Self {
            name: name.to_string(),
            message: error.to_string(),
        }
    }
}

/// Outcome of installing every manifest entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Entries that are installed, in manifest order.
    pub succeeded: Vec<String>,
    pub failed: Vec<Failure>,
    /// Everything fetched during the batch, dependencies included.
    pub installed: Vec<InstalledPackage>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of sweeping the module root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub removed: Vec<String>,
    /// Untracked directories still required by a tracked package.
    pub kept: Vec<String>,
    pub failed: Vec<Failure>,
}

impl CleanReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A package moved from one version to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChange {
    pub name: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    UpToDate { name: String, version: String },
    Updated(VersionChange),
}

/// Outcome of updating every manifest entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub updated: Vec<VersionChange>,
    pub up_to_date: Vec<String>,
    pub failed: Vec<Failure>,
}

impl UpdateReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Manifest entries checked against the module root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub ok: Vec<InstalledPackage>,
    pub missing: Vec<InstalledPackage>,
}

impl VerifyReport {
    pub fn is_success(&self) -> bool {
        self.missing.is_empty()
    }
}

/// What `init` had to create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitOutcome {
    pub created_modules_dir: bool,
    pub created_manifest: bool,
}
