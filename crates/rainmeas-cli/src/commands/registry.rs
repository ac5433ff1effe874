//! Registry query commands

use colored::Colorize;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the search command
pub fn run_search(ctx: &Context, query: &str) -> Result<()> {
    let registry = ctx.registry()?;
    let results = registry.search(query)?;

    if results.is_empty() {
        println!("No packages match '{}'.", query);
        return Ok(());
    }

    for (name, summary) in &results {
        let latest = summary.latest.as_deref().unwrap_or("-");
        let description = summary.description.as_deref().unwrap_or("");
        println!("  {:<24} {:<10} {}", name.green(), latest, description);
    }
    Ok(())
}

/// Run the info command
pub fn run_info(ctx: &Context, name: &str) -> Result<()> {
    let registry = ctx.registry()?;
    let Some(meta) = registry.package_info(name)? else {
        return Err(CliError::user(format!(
            "Package '{}' not found in registry",
            name
        )));
    };
    let latest = registry.latest_version(name)?;

    println!("{}", name.bold());
    if let Some(description) = &meta.description {
        println!("  {}", description);
    }
    println!();
    for (label, value) in [
        ("Author", meta.author.as_deref()),
        ("License", meta.license.as_deref()),
        ("Homepage", meta.homepage.as_deref()),
        ("Latest", latest.as_deref()),
    ] {
        if let Some(value) = value {
            println!("  {:<10} {}", format!("{label}:").cyan(), value);
        }
    }

    let versions = meta.available_versions();
    if !versions.is_empty() {
        println!("  {:<10} {}", "Versions:".cyan(), versions.join(", "));
    }

    if let Some(latest) = &latest {
        let dependencies = meta.dependencies(latest);
        if !dependencies.is_empty() {
            println!("  {}", "Dependencies:".cyan());
            for (dependency, spec) in &dependencies {
                println!("    {dependency} {}", spec.dimmed());
            }
        }
    }
    Ok(())
}
