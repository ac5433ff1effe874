//! Update command implementation

use colored::Colorize;
use rainmeas_core::UpdateOutcome;

use super::print_failures;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the update command
///
/// Updates `name`, or every manifest entry when no name is given.
pub fn run_update(ctx: &Context, name: Option<&str>) -> Result<()> {
    let mut installer = ctx.installer()?;

    let Some(name) = name else {
        let report = installer.update_all()?;
        for change in &report.updated {
            println!(
                "  {} {} {} -> {}",
                "^".green(),
                change.name,
                change.from.dimmed(),
                change.to.green()
            );
        }
        for name in &report.up_to_date {
            println!("  {} {} {}", "=".blue(), name, "(up to date)".dimmed());
        }
        print_failures(&report.failed);

        if !report.is_success() {
            return Err(CliError::user(format!(
                "{} packages failed to update",
                report.failed.len()
            )));
        }
        println!(
            "{} {} updated, {} already up to date",
            "OK".green().bold(),
            report.updated.len(),
            report.up_to_date.len()
        );
        return Ok(());
    };

    match installer.update(name)? {
        UpdateOutcome::UpToDate { name, version } => {
            println!(
                "{} {}@{} is already the latest version",
                "OK".green().bold(),
                name,
                version
            );
        }
        UpdateOutcome::Updated(change) => {
            println!(
                "{} Updated {} from {} to {}",
                "OK".green().bold(),
                change.name.cyan(),
                change.from,
                change.to.green()
            );
        }
    }
    Ok(())
}
