//! Error types for rainmeas-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from rainmeas-core
    #[error(transparent)]
    Core(#[from] rainmeas_core::Error),

    /// Error from rainmeas-registry
    #[error(transparent)]
    Registry(#[from] rainmeas_registry::Error),

    /// Error from rainmeas-fs
    #[error(transparent)]
    Fs(#[from] rainmeas_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
