//! Per-command resolution state.

use indexmap::{IndexMap, IndexSet};
use rainmeas_registry::VersionSpec;

use super::report::InstalledPackage;

/// Bookkeeping for one top-level command.
///
/// `visited` is the cycle and duplicate guard: a name is processed at most
/// once per session. Batch entries are requested up front together with
/// their own version spec, which takes precedence when the same name is
/// reached as a dependency. Nothing here is persisted.
#[derive(Debug, Default)]
pub struct InstallSession {
    visited: IndexSet<String>,
    explicitly_requested: IndexSet<String>,
    pinned: IndexMap<String, VersionSpec>,
    installed: Vec<InstalledPackage>,
}

impl InstallSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything; called at the start of each top-level command.
    pub fn reset(&mut self) {
        self.visited.clear();
        self.explicitly_requested.clear();
        self.pinned.clear();
        self.installed.clear();
    }

    pub fn is_visited(&self, name: &str) -> bool {
        self.visited.contains(name)
    }

    pub(crate) fn visit(&mut self, name: &str) {
        self.visited.insert(name.to_string());
    }

    /// Undo [`visit`](Self::visit) for a package whose install failed, so a
    /// later dependent in the same session does not mistake it for satisfied.
    pub(crate) fn forget(&mut self, name: &str) {
        self.visited.shift_remove(name);
    }

    pub(crate) fn request(&mut self, name: &str) {
        self.explicitly_requested.insert(name.to_string());
    }

    /// Request `name` at `spec` before it is processed.
    pub(crate) fn pin(&mut self, name: &str, spec: VersionSpec) {
        self.request(name);
        self.pinned.insert(name.to_string(), spec);
    }

    /// The spec `name` was requested at, if it is a batch entry.
    pub fn pinned_spec(&self, name: &str) -> Option<&VersionSpec> {
        self.pinned.get(name)
    }

    pub fn is_explicitly_requested(&self, name: &str) -> bool {
        self.explicitly_requested.contains(name)
    }

    pub fn explicitly_requested(&self) -> impl Iterator<Item = &str> {
        self.explicitly_requested.iter().map(String::as_str)
    }

    pub(crate) fn record(&mut self, package: InstalledPackage) {
        self.installed.push(package);
    }

    /// Packages installed so far, dependencies before their dependents.
    pub fn installed(&self) -> &[InstalledPackage] {
        &self.installed
    }
}
