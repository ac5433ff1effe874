//! [`RegistryClient`] over JSON documents from any [`DocumentSource`].

use std::cell::RefCell;
use std::collections::HashMap;

use rainmeas_fs::validate_path_component;

use crate::client::RegistryClient;
use crate::model::{PackageMetadata, RegistryIndex};
use crate::source::DocumentSource;
use crate::{Error, Result};

const INDEX_DOCUMENT: &str = "index.json";

/// Registry backed by `index.json` plus one `packages/<name>.json` per package.
///
/// Documents are fetched lazily and cached for the lifetime of the value,
/// so every answer within one command comes from the same snapshot.
pub struct JsonRegistry<S> {
    source: S,
    index: RefCell<Option<RegistryIndex>>,
    packages: RefCell<HashMap<String, Option<PackageMetadata>>>,
}

impl<S: DocumentSource> JsonRegistry<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            index: RefCell::new(None),
            packages: RefCell::new(HashMap::new()),
        }
    }

    /// The underlying document source.
    pub fn source(&self) -> &S {
        &self.source
    }

    fn load_index(&self) -> Result<RegistryIndex> {
        if let Some(index) = self.index.borrow().as_ref() {
            return Ok(index.clone());
        }

        let index: RegistryIndex = match self.source.fetch(INDEX_DOCUMENT)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| Error::Parse {
                document: format!("{}/{}", self.source.describe(), INDEX_DOCUMENT),
                source,
            })?,
            None => {
                tracing::warn!(registry = %self.source.describe(), "Registry has no index.json");
                RegistryIndex::new()
            }
        };

        *self.index.borrow_mut() = Some(index.clone());
        Ok(index)
    }

    fn load_package(&self, name: &str) -> Result<Option<PackageMetadata>> {
        validate_path_component(name)?;

        if let Some(cached) = self.packages.borrow().get(name) {
            return Ok(cached.clone());
        }

        let document = format!("packages/{name}.json");
        let meta = match self.source.fetch(&document)? {
            Some(raw) => Some(serde_json::from_str::<PackageMetadata>(&raw).map_err(
                |source| Error::Parse {
                    document: format!("{}/{}", self.source.describe(), document),
                    source,
                },
            )?),
            None => None,
        };

        self.packages
            .borrow_mut()
            .insert(name.to_string(), meta.clone());
        Ok(meta)
    }
}

impl<S: DocumentSource> RegistryClient for JsonRegistry<S> {
    fn package_info(&self, name: &str) -> Result<Option<PackageMetadata>> {
        self.load_package(name)
    }

    fn latest_version(&self, name: &str) -> Result<Option<String>> {
        validate_path_component(name)?;

        if let Some(latest) = self
            .load_index()?
            .get(name)
            .and_then(|summary| summary.latest.clone())
        {
            return Ok(Some(latest));
        }

        let Some(meta) = self.load_package(name)? else {
            return Ok(None);
        };
        Ok(meta
            .latest_alias()
            .or_else(|| meta.highest_version())
            .map(str::to_string))
    }

    fn download_locator(&self, name: &str, version: &str) -> Result<Option<String>> {
        let Some(meta) = self.load_package(name)? else {
            return Ok(None);
        };
        Ok(meta
            .record(version)
            .and_then(|record| record.download.as_deref())
            .filter(|download| !download.trim().is_empty())
            .map(|download| self.source.resolve_locator(download.trim())))
    }

    fn search(&self, query: &str) -> Result<RegistryIndex> {
        let query = query.to_lowercase();
        let mut results = RegistryIndex::new();

        for (name, summary) in self.load_index()? {
            let matched = name.to_lowercase().contains(&query)
                || summary.matches_details(&query)
                || match self.load_package(&name) {
                    Ok(Some(meta)) => meta.matches_details(&query),
                    Ok(None) => false,
                    Err(e) => {
                        tracing::warn!(package = %name, error = %e, "Skipping unreadable package during search");
                        false
                    }
                };
            if matched {
                results.insert(name, summary);
            }
        }

        Ok(results)
    }

    fn list_all(&self) -> Result<RegistryIndex> {
        self.load_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// In-memory source that counts fetches.
    struct StaticSource {
        documents: HashMap<&'static str, &'static str>,
        fetches: Cell<usize>,
    }

    impl DocumentSource for StaticSource {
        fn fetch(&self, path: &str) -> Result<Option<String>> {
            self.fetches.set(self.fetches.get() + 1);
            Ok(self.documents.get(path).map(|doc| doc.to_string()))
        }

        fn resolve_locator(&self, locator: &str) -> String {
            format!("mem://{locator}")
        }

        fn describe(&self) -> String {
            "memory".into()
        }
    }

    fn registry() -> JsonRegistry<StaticSource> {
        let mut documents = HashMap::new();
        documents.insert(
            "index.json",
            r#"{"clock": {"latest": "2.0.0", "description": "Analog clock"}, "orphan": {}}"#,
        );
        documents.insert(
            "packages/clock.json",
            r#"{"author": "Jane", "versions": {"2.0.0": {"download": "clock.zip"}}}"#,
        );
        documents.insert(
            "packages/orphan.json",
            r#"{"versions": {"0.9.0": {}, "0.10.0": {"download": " "}}}"#,
        );
        documents.insert("packages/broken.json", "{ nope");
        JsonRegistry::new(StaticSource {
            documents,
            fetches: Cell::new(0),
        })
    }

    #[test]
    fn package_documents_are_cached() {
        let registry = registry();
        registry.package_info("clock").unwrap();
        registry.package_info("clock").unwrap();
        registry.package_info("ghost").unwrap();
        registry.package_info("ghost").unwrap();
        assert_eq!(registry.source().fetches.get(), 2);
    }

    #[test]
    fn latest_falls_back_to_highest_version() {
        let registry = registry();
        assert_eq!(registry.latest_version("clock").unwrap().as_deref(), Some("2.0.0"));
        assert_eq!(registry.latest_version("orphan").unwrap().as_deref(), Some("0.10.0"));
        assert_eq!(registry.latest_version("ghost").unwrap(), None);
    }

    #[test]
    fn blank_download_is_absent() {
        let registry = registry();
        assert_eq!(registry.download_locator("orphan", "0.10.0").unwrap(), None);
        assert_eq!(
            registry.download_locator("clock", "2.0.0").unwrap().as_deref(),
            Some("mem://clock.zip")
        );
    }

    #[test]
    fn malformed_document_is_an_error() {
        let err = registry().package_info("broken").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn invalid_names_never_reach_the_source() {
        let registry = registry();
        assert!(registry.package_info("../index").is_err());
        assert_eq!(registry.source().fetches.get(), 0);
    }
}
