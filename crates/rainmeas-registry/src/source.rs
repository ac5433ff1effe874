//! Where registry documents come from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rainmeas_fs::io;

use crate::{Error, Result};

/// A place registry documents can be read from.
pub trait DocumentSource {
    /// Fetch the document at `path` (e.g. `packages/corelib.json`).
    ///
    /// Returns `Ok(None)` when the document does not exist.
    fn fetch(&self, path: &str) -> Result<Option<String>>;

    /// Turn a `download` value from a document into a locator the transport
    /// can use without knowing where the registry lives.
    fn resolve_locator(&self, locator: &str) -> String;

    /// Human-readable location for logs and messages.
    fn describe(&self) -> String;
}

/// Registry stored in a local directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for DirectorySource {
    fn fetch(&self, path: &str) -> Result<Option<String>> {
        let full = self.root.join(path);
        tracing::debug!(path = %full.display(), "Reading registry document");
        Ok(io::read_text_if_exists(&full)?)
    }

    fn resolve_locator(&self, locator: &str) -> String {
        if locator.contains("://") || Path::new(locator).is_absolute() {
            locator.to_string()
        } else {
            self.root.join(locator).to_string_lossy().into_owned()
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Registry served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    /// Create a source rooted at `base`, with a per-request `timeout`.
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let mut base = base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        reqwest::Url::parse(&base).map_err(|e| Error::InvalidLocation {
            location: base.clone(),
            reason: e.to_string(),
        })?;

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("rainmeas/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http {
                url: base.clone(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { base, client })
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, path: &str) -> Result<Option<String>> {
        let url = format!("{}{}", self.base, path);
        tracing::debug!(%url, "Fetching registry document");

        let response = self.client.get(&url).send().map_err(|e| Error::Http {
            url: url.clone(),
            message: e.to_string(),
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::Http {
                message: format!("HTTP {}", response.status()),
                url,
            });
        }

        response.text().map(Some).map_err(|e| Error::Http {
            url,
            message: e.to_string(),
        })
    }

    fn resolve_locator(&self, locator: &str) -> String {
        reqwest::Url::parse(&self.base)
            .and_then(|base| base.join(locator))
            .map(|url| url.to_string())
            .unwrap_or_else(|_| locator.to_string())
    }

    fn describe(&self) -> String {
        self.base.clone()
    }
}
