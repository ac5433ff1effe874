//! List and verify command implementations

use colored::Colorize;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the list command
///
/// Prints manifest entries; with `all`, also the module folders that are
/// on disk without a manifest entry.
pub fn run_list(ctx: &Context, all: bool) -> Result<()> {
    let installer = ctx.installer()?;
    let packages = installer.list()?;

    if packages.is_empty() {
        println!("No packages installed.");
    } else {
        println!("{}", "Installed packages".bold());
        for package in &packages {
            println!("  {:<24} {}", package.name.green(), package.version);
        }
    }

    if all {
        let unmanaged: Vec<String> = installer
            .list_on_disk()?
            .into_iter()
            .filter(|name| !packages.iter().any(|p| &p.name == name))
            .collect();
        if !unmanaged.is_empty() {
            println!();
            println!("{}", "Other module folders".bold());
            for name in &unmanaged {
                println!("  {}", name.dimmed());
            }
        }
    }
    Ok(())
}

/// Run the verify command
pub fn run_verify(ctx: &Context) -> Result<()> {
    let installer = ctx.installer()?;
    let report = installer.verify()?;

    for package in &report.ok {
        println!("  {} {}", "ok".green(), package);
    }
    for package in &report.missing {
        println!("  {} {}", "missing".red().bold(), package);
    }

    if !report.is_success() {
        return Err(CliError::user(format!(
            "{} packages are missing from disk. Run 'rainmeas install' to restore them.",
            report.missing.len()
        )));
    }
    println!(
        "{} {} packages verified",
        "OK".green().bold(),
        report.ok.len()
    );
    Ok(())
}
