//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// rainmeas - Package manager for Rainmeter skin modules
#[derive(Parser, Debug)]
#[command(name = "rainmeas")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (the version is printed by -V or `version`)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Registry URL or local directory
    #[arg(long, global = true, env = "RAINMEAS_REGISTRY", value_name = "URL_OR_DIR")]
    pub registry: Option<String>,

    /// Network timeout in seconds
    #[arg(long, global = true, env = "RAINMEAS_TIMEOUT_SECS", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "project", global = true, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create the module folder and an empty rainmeas-package.json
    Init,

    /// Install a package and its dependencies
    ///
    /// Without an argument, installs every package listed in
    /// rainmeas-package.json.
    ///
    /// Examples:
    ///   rainmeas install weatherwidget         # Latest version
    ///   rainmeas install weatherwidget@1.1.0   # Exact version
    ///   rainmeas install                       # Everything in the manifest
    #[command(visible_alias = "i")]
    Install {
        /// Package as NAME or NAME@VERSION
        package: Option<String>,
    },

    /// Remove an installed package
    ///
    /// Its dependencies stay on disk until `rainmeas clean`.
    Remove {
        /// Name of the package to remove
        name: String,
    },

    /// Update one package, or every installed package, to the latest version
    Update {
        /// Name of the package to update
        name: Option<String>,
    },

    /// List installed packages
    List {
        /// Also show module folders not tracked in the manifest
        #[arg(short, long)]
        all: bool,
    },

    /// Search the registry by name, description or author
    Search {
        /// Text to look for
        query: String,
    },

    /// Show registry details for a package
    Info {
        /// Name of the package
        name: String,
    },

    /// Check that every installed package is present on disk
    Verify,

    /// Remove module folders no installed package needs
    Clean,

    /// Print the rainmeas version
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
