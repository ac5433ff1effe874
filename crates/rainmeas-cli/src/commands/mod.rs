//! Command implementations for rainmeas-cli

pub mod init;
pub mod install;
pub mod list;
pub mod registry;
pub mod remove;
pub mod update;

pub use init::run_init;
pub use install::run_install;
pub use list::{run_list, run_verify};
pub use registry::{run_info, run_search};
pub use remove::{run_clean, run_remove};
pub use update::run_update;

use colored::Colorize;
use rainmeas_core::Failure;

/// Print the failed items of a batch, one per line.
fn print_failures(failures: &[Failure]) {
    for failure in failures {
        eprintln!(
            "  {} {}: {}",
            "x".red().bold(),
            failure.name.red(),
            failure.message
        );
    }
}
