//! Registry document schema.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::version::{self, LATEST};

/// The registry index: package name to summary, in registry order.
pub type RegistryIndex = IndexMap<String, PackageSummary>;

/// One entry of `index.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Full metadata document for one package (`packages/<name>.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Version string (or the `latest` alias) to version entry.
    #[serde(default)]
    pub versions: IndexMap<String, VersionEntry>,
}

/// A value of the `versions` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionEntry {
    /// Points at another version, e.g. `"latest": "1.2.0"`.
    Alias(String),
    Record(VersionRecord),
}

/// Download location and dependencies of one concrete version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,
    /// Dependency name to version specifier, in registry order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, String>,
}

impl PackageMetadata {
    /// The record for `version`, following a single alias hop.
    pub fn record(&self, version: &str) -> Option<&VersionRecord> {
        match self.versions.get(version)? {
            VersionEntry::Record(record) => Some(record),
            VersionEntry::Alias(target) => match self.versions.get(target)? {
                VersionEntry::Record(record) => Some(record),
                VersionEntry::Alias(_) => None,
            },
        }
    }

    /// Whether `version` names a concrete version of this package.
    pub fn has_version(&self, version: &str) -> bool {
        matches!(self.versions.get(version), Some(VersionEntry::Record(_)))
    }

    /// Concrete versions (aliases excluded), sorted ascending.
    pub fn available_versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = self
            .versions
            .iter()
            .filter(|(_, entry)| matches!(entry, VersionEntry::Record(_)))
            .map(|(name, _)| name.clone())
            .collect();
        version::sort_versions(&mut versions);
        versions
    }

    /// Target of the `latest` alias, if the document declares one.
    pub fn latest_alias(&self) -> Option<&str> {
        match self.versions.get(LATEST)? {
            VersionEntry::Alias(target) => Some(target.as_str()),
            VersionEntry::Record(_) => None,
        }
    }

    /// Highest concrete version by registry ordering.
    pub fn highest_version(&self) -> Option<&str> {
        version::max_version(
            self.versions
                .iter()
                .filter(|(_, entry)| matches!(entry, VersionEntry::Record(_)))
                .map(|(name, _)| name.as_str()),
        )
    }

    /// Declared dependencies of `version`, empty when it has none or is unknown.
    pub fn dependencies(&self, version: &str) -> IndexMap<String, String> {
        self.record(version)
            .map(|record| record.dependencies.clone())
            .unwrap_or_default()
    }

    /// Whether `query` (already lowercased) matches the description or author.
    pub(crate) fn matches_details(&self, query: &str) -> bool {
        contains_lowercase(self.description.as_deref(), query)
            || contains_lowercase(self.author.as_deref(), query)
    }
}

impl PackageSummary {
    pub(crate) fn matches_details(&self, query: &str) -> bool {
        contains_lowercase(self.description.as_deref(), query)
            || contains_lowercase(self.author.as_deref(), query)
    }
}

fn contains_lowercase(field: Option<&str>, query: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(query))
}
