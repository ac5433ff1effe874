//! Remove and clean command implementations

use colored::Colorize;

use super::print_failures;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the remove command
pub fn run_remove(ctx: &Context, name: &str) -> Result<()> {
    let mut installer = ctx.installer()?;
    installer.remove(name)?;

    println!("{} Removed {}", "OK".green().bold(), name.cyan());
    println!(
        "   Run {} to remove dependencies nothing else needs.",
        "rainmeas clean".cyan()
    );
    Ok(())
}

/// Run the clean command
pub fn run_clean(ctx: &Context) -> Result<()> {
    let mut installer = ctx.installer()?;
    let report = installer.clean()?;

    for name in &report.removed {
        println!("  {} {}", "-".red(), name);
    }
    for name in &report.kept {
        println!("  {} {} {}", "=".blue(), name, "(still required)".dimmed());
    }
    print_failures(&report.failed);

    if !report.is_success() {
        return Err(CliError::user(format!(
            "{} module folders could not be removed",
            report.failed.len()
        )));
    }
    if report.removed.is_empty() {
        println!("{} Nothing to clean", "OK".green().bold());
    } else {
        println!(
            "{} Removed {} unused module folders",
            "OK".green().bold(),
            report.removed.len()
        );
    }
    Ok(())
}
