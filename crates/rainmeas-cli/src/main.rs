//! rainmeas CLI
//!
//! The command-line interface for installing Rainmeter skin modules.

mod cli;
mod commands;
mod context;
mod error;

use std::io;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG`, defaulting to warnings only or
/// to debug output with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(verbose)
                .compact(),
        )
        .try_init();
    tracing::debug!("Verbose mode enabled");
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command.clone() else {
        println!(
            "{} Package manager for Rainmeter skin modules",
            "rainmeas".green().bold()
        );
        println!();
        println!("Run {} for available commands.", "rainmeas --help".cyan());
        return Ok(());
    };

    match command {
        Commands::Version => {
            println!("rainmeas {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "rainmeas", &mut io::stdout());
            Ok(())
        }
        command => {
            let ctx = Context::from_cli(&cli)?;
            execute_command(&ctx, command)
        }
    }
}

fn execute_command(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Init => commands::run_init(ctx),
        Commands::Install { package } => commands::run_install(ctx, package.as_deref()),
        Commands::Remove { name } => commands::run_remove(ctx, &name),
        Commands::Update { name } => commands::run_update(ctx, name.as_deref()),
        Commands::List { all } => commands::run_list(ctx, all),
        Commands::Search { query } => commands::run_search(ctx, &query),
        Commands::Info { name } => commands::run_info(ctx, &name),
        Commands::Verify => commands::run_verify(ctx),
        Commands::Clean => commands::run_clean(ctx),
        Commands::Version | Commands::Completions { .. } => Ok(()),
    }
}
