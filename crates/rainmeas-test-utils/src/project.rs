//! [`TestProject`] builder for skin project test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rainmeas_fs::ProjectLayout;
use tempfile::TempDir;

/// A temporary skin project with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use rainmeas_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.write_manifest(&[("weatherwidget", "1.2.0")]);
/// project.assert_module_absent("weatherwidget");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Layout of this project.
    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(self.root())
    }

    /// Directory of module `name`.
    pub fn module_dir(&self, name: &str) -> PathBuf {
        self.layout().modules_dir().join(name)
    }

    /// Write `rainmeas-package.json` with the given entries, in order.
    pub fn write_manifest(&self, packages: &[(&str, &str)]) {
        let packages: IndexMap<&str, &str> = packages.iter().copied().collect();
        let doc = serde_json::json!({ "packages": packages });
        fs::write(
            self.layout().manifest_path(),
            serde_json::to_string_pretty(&doc).unwrap(),
        )
        .unwrap();
    }

    /// Write raw manifest text.
    pub fn write_manifest_raw(&self, content: &str) {
        fs::write(self.layout().manifest_path(), content).unwrap();
    }

    /// Read the `packages` mapping of the manifest, in file order.
    ///
    /// # Panics
    /// Panics if the manifest does not exist or is malformed.
    pub fn read_manifest(&self) -> IndexMap<String, String> {
        let raw = fs::read_to_string(self.layout().manifest_path())
            .expect("TestProject::read_manifest: manifest missing");
        #[derive(serde::Deserialize)]
        struct Doc {
            #[serde(default)]
            packages: IndexMap<String, String>,
        }
        let doc: Doc = serde_json::from_str(&raw).expect("TestProject::read_manifest: bad JSON");
        doc.packages
    }

    /// Create a module directory with a marker file, as if it were installed.
    pub fn create_module(&self, name: &str, marker: &str) {
        let dir = self.module_dir(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("README.md"), marker).unwrap();
    }

    /// Contents of `file` inside module `name`.
    pub fn read_module_file(&self, name: &str, file: &str) -> String {
        fs::read_to_string(self.module_dir(name).join(file)).unwrap_or_else(|e| {
            panic!("Expected {name}/{file} to be readable: {e}");
        })
    }

    /// Names of all entries under the module root, sorted.
    pub fn module_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(self.layout().modules_dir()) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    /// Assert that module `name` is present on disk.
    ///
    /// # Panics
    /// Panics with a descriptive message if the directory does not exist.
    pub fn assert_module_exists(&self, name: &str) {
        let dir = self.module_dir(name);
        assert!(dir.is_dir(), "Expected module to exist: {}", dir.display());
    }

    /// Assert that module `name` is **not** present on disk.
    ///
    /// # Panics
    /// Panics with a descriptive message if the directory exists.
    pub fn assert_module_absent(&self, name: &str) {
        let dir = self.module_dir(name);
        assert!(!dir.exists(), "Expected module NOT to exist: {}", dir.display());
    }
}
