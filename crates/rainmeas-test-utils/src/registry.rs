//! [`RegistryFixture`]: an on-disk registry with real zip archives.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use tempfile::TempDir;

use crate::archive;

#[derive(Debug, Default, Serialize)]
struct PackageDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    license: Option<String>,
    versions: IndexMap<String, VersionDoc>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum VersionDoc {
    Alias(String),
    Record {
        #[serde(skip_serializing_if = "Option::is_none")]
        download: Option<String>,
        #[serde(skip_serializing_if = "IndexMap::is_empty")]
        dependencies: IndexMap<String, String>,
    },
}

#[derive(Debug, Default, Serialize)]
struct IndexEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    latest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

/// A registry directory in a temp dir, rewritten after every change.
///
/// # Example
///
/// ```rust,no_run
/// use rainmeas_test_utils::RegistryFixture;
///
/// let mut registry = RegistryFixture::new();
/// registry.publish("corelib", "1.0.0", &[]);
/// registry.publish("weatherwidget", "1.2.0", &[("corelib", "1.0.0")]);
/// registry.set_latest("weatherwidget", "1.2.0");
/// let location = registry.location();
/// ```
pub struct RegistryFixture {
    temp_dir: TempDir,
    packages: IndexMap<String, PackageDoc>,
    index: IndexMap<String, IndexEntry>,
}

impl Default for RegistryFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryFixture {
    /// Create an empty registry.
    pub fn new() -> Self {
        let fixture = Self {
            temp_dir: TempDir::new().unwrap(),
            packages: IndexMap::new(),
            index: IndexMap::new(),
        };
        fixture.flush();
        fixture
    }

    /// Registry root directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Registry location string accepted by `rainmeas_registry::open`.
    pub fn location(&self) -> String {
        self.root().to_string_lossy().into_owned()
    }

    /// Relative archive path used for `name@version`.
    pub fn archive_path(name: &str, version: &str) -> String {
        format!("archives/{name}-{version}.zip")
    }

    /// Publish `name@version` with a real archive.
    ///
    /// The archive holds `README.md` (`"<name>@<version>"`) and
    /// `Skin/<name>.ini`. Dependencies keep the given order.
    pub fn publish(&mut self, name: &str, version: &str, dependencies: &[(&str, &str)]) {
        let marker = format!("{name}@{version}");
        let ini_name = format!("Skin/{name}.ini");
        let ini = format!("[Rainmeter]\nName={name}\n");
        self.publish_with_files(
            name,
            version,
            dependencies,
            &[("README.md", marker.as_str()), (ini_name.as_str(), ini.as_str())],
        );
    }

    /// Publish `name@version` with an archive containing exactly `files`.
    pub fn publish_with_files(
        &mut self,
        name: &str,
        version: &str,
        dependencies: &[(&str, &str)],
        files: &[(&str, &str)],
    ) {
        let relative = Self::archive_path(name, version);
        archive::write_zip(&self.root().join(&relative), files);
        self.add_record(name, version, Some(relative), dependencies);
    }

    /// Publish `name@version` whose record has no `download` key.
    pub fn publish_without_download(&mut self, name: &str, version: &str) {
        self.add_record(name, version, None, &[]);
    }

    /// Publish `name@version` whose archive file is not valid zip data.
    pub fn publish_corrupt(&mut self, name: &str, version: &str) {
        let relative = Self::archive_path(name, version);
        let path = self.root().join(&relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"this is not a zip archive").unwrap();
        self.add_record(name, version, Some(relative), &[]);
    }

    /// Delete the archive of `name@version`, simulating an unreachable download.
    pub fn remove_archive(&self, name: &str, version: &str) {
        fs::remove_file(self.root().join(Self::archive_path(name, version))).unwrap();
    }

    /// Declare `version` as the latest of `name` in both index and package document.
    pub fn set_latest(&mut self, name: &str, version: &str) {
        self.index.entry(name.to_string()).or_default().latest = Some(version.to_string());
        let doc = self.packages.entry(name.to_string()).or_default();
        doc.versions
            .insert("latest".to_string(), VersionDoc::Alias(version.to_string()));
        self.flush();
    }

    /// Set description and author of `name`.
    pub fn describe(&mut self, name: &str, description: &str, author: &str) {
        let doc = self.packages.entry(name.to_string()).or_default();
        doc.description = Some(description.to_string());
        doc.author = Some(author.to_string());
        doc.license = Some("MIT".to_string());
        self.index.entry(name.to_string()).or_default();
        self.flush();
    }

    fn add_record(
        &mut self,
        name: &str,
        version: &str,
        download: Option<String>,
        dependencies: &[(&str, &str)],
    ) {
        let dependencies = dependencies
            .iter()
            .map(|(dep, spec)| (dep.to_string(), spec.to_string()))
            .collect();
        self.packages
            .entry(name.to_string())
            .or_default()
            .versions
            .insert(
                version.to_string(),
                VersionDoc::Record {
                    download,
                    dependencies,
                },
            );
        self.index.entry(name.to_string()).or_default();
        self.flush();
    }

    fn flush(&self) {
        let packages_dir = self.root().join("packages");
        fs::create_dir_all(&packages_dir).unwrap();

        let index: IndexMap<&String, IndexEntry> = self
            .index
            .iter()
            .map(|(name, entry)| {
                let description = self
                    .packages
                    .get(name)
                    .and_then(|doc| doc.description.clone());
                (
                    name,
                    IndexEntry {
                        latest: entry.latest.clone(),
                        description,
                    },
                )
            })
            .collect();
        fs::write(
            self.root().join("index.json"),
            serde_json::to_string_pretty(&index).unwrap(),
        )
        .unwrap();

        for (name, doc) in &self.packages {
            fs::write(
                packages_dir.join(format!("{name}.json")),
                serde_json::to_string_pretty(doc).unwrap(),
            )
            .unwrap();
        }
    }
}
