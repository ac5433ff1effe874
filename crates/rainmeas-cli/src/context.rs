//! Invocation context
//!
//! Resolves the settings and the project a command runs against, once, so
//! the library crates never consult the environment or the working
//! directory themselves.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rainmeas_core::{Installer, ZipTransport};
use rainmeas_fs::{ConfigStore, ProjectLayout};
use rainmeas_registry::{DEFAULT_REGISTRY_URL, RegistryClient};
use serde::Deserialize;

use crate::cli::Cli;
use crate::error::Result;

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Contents of the user config file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub registry: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub registry: String,
    pub timeout: Duration,
}

impl Settings {
    /// Merge explicit values (flags or environment, already combined by
    /// clap) over the config file over the built-in defaults.
    pub fn resolve(registry: Option<String>, timeout_secs: Option<u64>, file: FileConfig) -> Self {
        let registry = registry
            .or(file.registry)
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string());
        let timeout_secs = timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            registry,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Resolve settings for `cli`, reading the user config file only when a
    /// value is still missing.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = if cli.registry.is_some() && cli.timeout.is_some() {
            FileConfig::default()
        } else {
            match config_path() {
                Some(path) => load_file_config(&path)?,
                None => FileConfig::default(),
            }
        };
        Ok(Self::resolve(cli.registry.clone(), cli.timeout, file))
    }
}

/// `<config_dir>/rainmeas/config.toml`, when the platform has a config dir.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rainmeas").join("config.toml"))
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let config: Option<FileConfig> = ConfigStore::new().load_if_exists(path)?;
    if config.is_some() {
        tracing::debug!(path = %path.display(), "Loaded user config");
    }
    Ok(config.unwrap_or_default())
}

/// Everything a command needs to run.
#[derive(Debug, Clone)]
pub struct Context {
    pub start_dir: PathBuf,
    pub settings: Settings,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let start_dir = match &cli.project {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let settings = Settings::from_cli(cli)?;
        tracing::debug!(
            registry = %settings.registry,
            timeout_secs = settings.timeout.as_secs(),
            start = %start_dir.display(),
            "Resolved settings"
        );
        Ok(Self {
            start_dir,
            settings,
        })
    }

    /// The project containing the start directory.
    pub fn layout(&self) -> Result<ProjectLayout> {
        Ok(ProjectLayout::discover(&self.start_dir)?)
    }

    /// The start directory itself as a project root, without searching
    /// upwards.
    pub fn layout_here(&self) -> Result<ProjectLayout> {
        let root = dunce::canonicalize(&self.start_dir)?;
        Ok(ProjectLayout::new(root))
    }

    pub fn registry(&self) -> Result<Box<dyn RegistryClient>> {
        Ok(rainmeas_registry::open(
            &self.settings.registry,
            self.settings.timeout,
        )?)
    }

    pub fn installer(&self) -> Result<Installer> {
        self.installer_for(self.layout()?)
    }

    pub fn installer_for(&self, layout: ProjectLayout) -> Result<Installer> {
        let transport = ZipTransport::new(self.settings.timeout)?;
        Ok(Installer::for_project(
            layout,
            self.registry()?,
            Box::new(transport),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn explicit_values_win() {
        let file = FileConfig {
            registry: Some("/from/file".into()),
            timeout_secs: Some(5),
        };
        let settings = Settings::resolve(Some("/from/flag".into()), Some(9), file);
        assert_eq!(settings.registry, "/from/flag");
        assert_eq!(settings.timeout, Duration::from_secs(9));
    }

    #[test]
    fn file_fills_missing_values() {
        let file = FileConfig {
            registry: Some("/from/file".into()),
            timeout_secs: None,
        };
        let settings = Settings::resolve(None, Some(9), file);
        assert_eq!(settings.registry, "/from/file");
        assert_eq!(settings.timeout, Duration::from_secs(9));
    }

    #[test]
    fn defaults_apply_last() {
        let settings = Settings::resolve(None, None, FileConfig::default());
        assert_eq!(settings.registry, DEFAULT_REGISTRY_URL);
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn file_config_loads_partial_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = 15\n").unwrap();

        let config = load_file_config(&path).unwrap();
        assert_eq!(
            config,
            FileConfig {
                registry: None,
                timeout_secs: Some(15),
            }
        );
    }

    #[test]
    fn missing_file_config_is_default() {
        let dir = tempdir().unwrap();
        let config = load_file_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, FileConfig::default());
    }
}
