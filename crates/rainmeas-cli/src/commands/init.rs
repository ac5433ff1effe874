//! Init command implementation

use colored::Colorize;

use crate::context::Context;
use crate::error::Result;

/// Run the init command
///
/// Creates the module root and an empty manifest in the start directory.
/// Running it again is harmless.
pub fn run_init(ctx: &Context) -> Result<()> {
    let layout = ctx.layout_here()?;
    let installer = ctx.installer_for(layout.clone())?;
    let outcome = installer.init()?;

    if outcome.created_modules_dir {
        println!("   Created {}", layout.modules_dir().display());
    }
    if outcome.created_manifest {
        println!("   Created {}", layout.manifest_path().display());
    } else {
        println!(
            "   Kept existing {}",
            layout.manifest_path().display().to_string().yellow()
        );
    }

    println!(
        "{} Initialized rainmeas in {}",
        "OK".green().bold(),
        layout.root().display()
    );
    Ok(())
}
