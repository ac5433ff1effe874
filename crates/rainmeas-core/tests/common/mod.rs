//! Shared helpers for installer integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use rainmeas_core::{ArchiveTransport, Installer, Result, ZipTransport};
use rainmeas_test_utils::{RegistryFixture, TestProject};

/// One call to [`ArchiveTransport::fetch`].
#[derive(Debug, Clone)]
pub struct Fetch {
    /// Archive file stem, e.g. `corelib-1.0.0`.
    pub archive: String,
    /// Package directories present in the module root when the fetch began.
    pub modules_present: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FetchLog(Rc<RefCell<Vec<Fetch>>>);

impl FetchLog {
    pub fn fetches(&self) -> Vec<Fetch> {
        self.0.borrow().clone()
    }

    pub fn archives(&self) -> Vec<String> {
        self.0.borrow().iter().map(|f| f.archive.clone()).collect()
    }

    pub fn count(&self, archive: &str) -> usize {
        self.0.borrow().iter().filter(|f| f.archive == archive).count()
    }
}

/// Zip transport that records every fetch.
pub struct RecordingTransport {
    inner: ZipTransport,
    modules_dir: PathBuf,
    log: FetchLog,
}

impl ArchiveTransport for RecordingTransport {
    fn fetch(&self, locator: &str, dest: &Path) -> Result<()> {
        let archive = Path::new(locator)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.log.0.borrow_mut().push(Fetch {
            archive,
            modules_present: module_dirs(&self.modules_dir),
        });
        self.inner.fetch(locator, dest)
    }

    fn extract(&self, archive: &Path, dest_dir: &Path) -> Result<()> {
        self.inner.extract(archive, dest_dir)
    }
}

fn module_dirs(modules_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(modules_dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_dir())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|name| !name.starts_with('.'))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Installer for `project` against `registry`, plus its fetch log.
pub fn installer(project: &TestProject, registry: &RegistryFixture) -> (Installer, FetchLog) {
    let layout = project.layout();
    let log = FetchLog::default();
    let transport = RecordingTransport {
        inner: ZipTransport::new(Duration::from_secs(5)).unwrap(),
        modules_dir: layout.modules_dir().to_path_buf(),
        log: log.clone(),
    };
    let client = rainmeas_registry::open(&registry.location(), Duration::from_secs(5)).unwrap();
    let installer = Installer::for_project(layout, client, Box::new(transport));
    (installer, log)
}

/// `weatherwidget` 1.2.0 (latest) depending on `corelib` 1.0.0, plus an
/// older `weatherwidget` 1.1.0 with no dependencies.
pub fn weather_registry() -> RegistryFixture {
    let mut registry = RegistryFixture::new();
    registry.publish("corelib", "1.0.0", &[]);
    registry.publish("weatherwidget", "1.1.0", &[]);
    registry.publish("weatherwidget", "1.2.0", &[("corelib", "1.0.0")]);
    registry.set_latest("weatherwidget", "1.2.0");
    registry.set_latest("corelib", "1.0.0");
    registry
}
