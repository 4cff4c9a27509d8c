//! macdev CLI
//!
//! Per-project isolated Homebrew environments.

mod cli;
mod commands;
mod context;
mod error;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;
use macdev_core::AddOptions;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "macdev", &mut std::io::stdout());
        return Ok(());
    }

    let engine = context::engine(cli.global_manifest)?;
    execute_command(&engine, cli.command)
}

/// Warnings by default, debug with `--verbose`; `RUST_LOG` overrides both.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(engine: &macdev_core::Engine, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init => commands::run_init(engine),
        Commands::Add {
            packages,
            impure,
            cask,
        } => commands::run_add(engine, &packages, AddOptions { impure, cask }),
        Commands::Remove { packages } => commands::run_remove(engine, &packages),
        Commands::Install => commands::run_install(engine),
        Commands::List => commands::run_list(engine),
        Commands::Sync => commands::run_sync(engine),
        Commands::Gc { all } => commands::run_gc(engine, all),
        Commands::Upgrade { package } => commands::run_upgrade(engine, package.as_deref()),
        Commands::Check { quiet } => commands::run_check(engine, quiet),
        Commands::Tap { name } => commands::run_tap(engine, &name),
        Commands::Untap { name } => commands::run_untap(engine, &name),
        Commands::Shell => commands::run_shell(engine),
        Commands::Completions { .. } => Ok(()),
    }
}
