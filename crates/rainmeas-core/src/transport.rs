//! Fetching and unpacking package archives.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;

use crate::{Error, Result};

const ARCHIVE_FILE: &str = "package.zip";

/// Moves a package archive from a locator into a directory.
pub trait ArchiveTransport {
    /// Download the archive at `locator` into the file `dest`.
    fn fetch(&self, locator: &str, dest: &Path) -> Result<()>;

    /// Unpack `archive` into `dest_dir`, creating it.
    fn extract(&self, archive: &Path, dest_dir: &Path) -> Result<()>;

    /// Fetch then unpack into `dest_dir`.
    ///
    /// The download lands in a hidden temporary directory next to
    /// `dest_dir` that is removed whatever the outcome. On failure
    /// `dest_dir` does not exist afterwards.
    fn fetch_and_extract(&self, locator: &str, dest_dir: &Path) -> Result<()> {
        let parent = dest_dir.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

        let download = tempfile::Builder::new()
            .prefix(".download-")
            .tempdir_in(parent)
            .map_err(|e| Error::io(parent, e))?;
        let archive = download.path().join(ARCHIVE_FILE);

        self.fetch(locator, &archive)?;
        let result = self.extract(&archive, dest_dir);
        if result.is_err() && dest_dir.exists() {
            let _ = fs::remove_dir_all(dest_dir);
        }
        result
    }
}

/// [`ArchiveTransport`] for zip archives over HTTP(S), `file://` URLs or
/// plain paths.
#[derive(Debug, Clone)]
pub struct ZipTransport {
    client: reqwest::blocking::Client,
    retry_window: Duration,
}

impl ZipTransport {
    /// Transport whose HTTP requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("rainmeas/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport {
                locator: String::new(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            retry_window: Duration::from_secs(30),
        })
    }

    /// How long transient HTTP failures are retried before giving up.
    pub fn with_retry_window(mut self, window: Duration) -> Self {
        self.retry_window = window;
        self
    }

    fn fetch_http(&self, url: &str) -> Result<Vec<u8>> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(250))
            .with_max_elapsed_time(Some(self.retry_window))
            .build();

        let attempt = || -> std::result::Result<Vec<u8>, backoff::Error<String>> {
            let response = self.client.get(url).send().map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    tracing::debug!(%url, error = %e, "Transient download failure, retrying");
                    backoff::Error::transient(e.to_string())
                } else {
                    backoff::Error::permanent(e.to_string())
                }
            })?;

            let status = response.status();
            if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                tracing::debug!(%url, %status, "Server busy, retrying");
                return Err(backoff::Error::transient(format!("HTTP {status}")));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(format!("HTTP {status}")));
            }

            response
                .bytes()
                .map(|bytes| bytes.to_vec())
                .map_err(|e| backoff::Error::transient(e.to_string()))
        };

        backoff::retry(policy, attempt).map_err(|e| {
            let message = match e {
                backoff::Error::Permanent(message) => message,
                backoff::Error::Transient { err, .. } => err,
            };
            Error::Transport {
                locator: url.to_string(),
                message,
            }
        })
    }
}

impl ArchiveTransport for ZipTransport {
    fn fetch(&self, locator: &str, dest: &Path) -> Result<()> {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            tracing::debug!(url = %locator, "Downloading archive");
            let bytes = self.fetch_http(locator)?;
            fs::write(dest, bytes).map_err(|e| Error::io(dest, e))?;
            return Ok(());
        }

        let source = local_path(locator);
        tracing::debug!(path = %source.display(), "Copying archive");
        fs::copy(&source, dest).map_err(|e| Error::Transport {
            locator: locator.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    fn extract(&self, archive: &Path, dest_dir: &Path) -> Result<()> {
        let extract_err = |message: String| Error::Extract {
            archive: archive.to_path_buf(),
            message,
        };

        let file = File::open(archive).map_err(|e| extract_err(e.to_string()))?;
        let mut zip = zip::ZipArchive::new(file).map_err(|e| extract_err(e.to_string()))?;

        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let entry = zip.by_index(i).map_err(|e| extract_err(e.to_string()))?;
            let Some(path) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
                return Err(extract_err(format!(
                    "entry '{}' escapes the destination",
                    entry.name()
                )));
            };
            entries.push((path, entry.is_dir()));
        }
        let root = single_root(&entries);

        fs::create_dir_all(dest_dir).map_err(|e| Error::io(dest_dir, e))?;
        for (i, (path, is_dir)) in entries.iter().enumerate() {
            let relative = match &root {
                Some(root) => path.strip_prefix(root).unwrap_or(path),
                None => path.as_path(),
            };
            if relative.as_os_str().is_empty() {
                continue;
            }

            let out = dest_dir.join(relative);
            if *is_dir {
                fs::create_dir_all(&out).map_err(|e| Error::io(&out, e))?;
                continue;
            }
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }

            let mut entry = zip.by_index(i).map_err(|e| extract_err(e.to_string()))?;
            write_entry(&mut entry, &out)?;
        }

        tracing::debug!(
            archive = %archive.display(),
            dest = %dest_dir.display(),
            entries = entries.len(),
            "Extracted archive"
        );
        Ok(())
    }
}

fn local_path(locator: &str) -> PathBuf {
    let path = locator.strip_prefix("file://").unwrap_or(locator);
    // file:///C:/x on Windows
    #[cfg(windows)]
    let path = match path.strip_prefix('/') {
        Some(rest) if rest.as_bytes().get(1) == Some(&b':') => rest,
        _ => path,
    };
    PathBuf::from(path)
}

fn write_entry<R: Read>(entry: &mut R, out: &Path) -> Result<()> {
    let mut file = File::create(out).map_err(|e| Error::io(out, e))?;
    io::copy(entry, &mut file).map_err(|e| Error::io(out, e))?;
    Ok(())
}

/// The top-level folder every entry lives under, if there is exactly one.
///
/// Archives built by zipping a folder (`corelib-1.0.0/...`) install as if
/// the folder's contents had been zipped directly.
fn single_root(entries: &[(PathBuf, bool)]) -> Option<PathBuf> {
    let mut root: Option<&std::ffi::OsStr> = None;
    let mut has_nested = false;

    for (path, is_dir) in entries {
        let mut components = path.components();
        let Some(Component::Normal(first)) = components.next() else {
            return None;
        };
        let nested = components.next().is_some();
        if !nested && !is_dir {
            return None;
        }
        has_nested |= nested;

        match root {
            None => root = Some(first),
            Some(existing) if existing == first => {}
            Some(_) => return None,
        }
    }

    if has_nested {
        root.map(PathBuf::from)
    } else {
        None
    }
}
