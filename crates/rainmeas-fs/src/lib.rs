//! Filesystem layer for rainmeas
//!
//! Provides the project layout, name validation, and safe I/O operations
//! (atomic writes, advisory locks) shared by the registry and core crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;

pub use config::ConfigStore;
pub use constants::ProjectPath;
pub use error::{Error, Result};
pub use io::ProjectLock;
pub use layout::ProjectLayout;
pub use path::validate_path_component;
