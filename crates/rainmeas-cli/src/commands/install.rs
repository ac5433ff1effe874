//! Install command implementation

use colored::Colorize;
use rainmeas_core::InstalledPackage;
use rainmeas_registry::VersionSpec;

use super::print_failures;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the install command
///
/// With a target, installs that package and its dependencies. Without one,
/// installs every entry of an existing manifest.
pub fn run_install(ctx: &Context, target: Option<&str>) -> Result<()> {
    match target {
        Some(target) => install_one(ctx, target),
        None => install_manifest(ctx),
    }
}

fn install_one(ctx: &Context, target: &str) -> Result<()> {
    let (name, spec) = parse_target(target)?;
    let mut installer = ctx.installer()?;

    println!("{} Installing {}...", "=>".blue().bold(), target.cyan());
    let installed = installer.install(name, &spec)?;
    print_installed(&installed);

    match installed.iter().find(|p| p.explicit) {
        Some(package) => println!("{} Installed {}", "OK".green().bold(), package),
        None => println!("{} Installed {}", "OK".green().bold(), name),
    }
    Ok(())
}

fn install_manifest(ctx: &Context) -> Result<()> {
    let layout = ctx.layout()?;
    if !layout.manifest_path().is_file() {
        return Err(CliError::user(format!(
            "No rainmeas-package.json found in {}. Run 'rainmeas init' or name a package to install.",
            layout.root().display()
        )));
    }
    let mut installer = ctx.installer_for(layout)?;

    println!(
        "{} Installing packages from rainmeas-package.json...",
        "=>".blue().bold()
    );
    let report = installer.install_from_manifest()?;
    print_installed(&report.installed);
    print_failures(&report.failed);

    let total = report.succeeded.len() + report.failed.len();
    if !report.is_success() {
        return Err(CliError::user(format!(
            "{} of {} packages failed to install",
            report.failed.len(),
            total
        )));
    }
    println!(
        "{} {} packages installed",
        "OK".green().bold(),
        report.succeeded.len()
    );
    Ok(())
}

fn print_installed(packages: &[InstalledPackage]) {
    for package in packages {
        if package.explicit {
            println!("  {} {}", "+".green(), package);
        } else {
            println!("  {} {} {}", "+".green(), package, "(dependency)".dimmed());
        }
    }
}

/// Split `name[@version]` into the name and a version spec.
pub fn parse_target(target: &str) -> Result<(&str, VersionSpec)> {
    let (name, version) = match target.split_once('@') {
        Some((name, version)) => (name, Some(version)),
        None => (target, None),
    };

    if name.is_empty() {
        return Err(CliError::user(format!("Missing package name in '{target}'")));
    }
    match version {
        Some("") => Err(CliError::user(format!(
            "Missing version after '@' in '{target}'"
        ))),
        Some(version) => Ok((name, VersionSpec::parse(version))),
        None => Ok((name, VersionSpec::Latest)),
    }
}
