/// Errors that can occur while reading the registry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A registry document exists but is not valid JSON for its schema.
    #[error("failed to parse registry document {document}: {source}")]
    Parse {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    /// An HTTP request to the registry failed.
    #[error("registry request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// The configured registry location cannot be used.
    #[error("invalid registry location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    /// Filesystem error from rainmeas-fs.
    #[error(transparent)]
    Fs(#[from] rainmeas_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
