//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// macdev - Per-project isolated Homebrew environments
#[derive(Parser, Debug)]
#[command(name = "macdev")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Global manifest location [default: ~/.config/macdev/manifest.toml]
    #[arg(long, global = true, env = "MACDEV_GLOBAL_MANIFEST", value_name = "PATH")]
    pub global_manifest: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create an empty .macdev/manifest.toml in the current directory
    Init,

    /// Install packages and track them
    ///
    /// Pure packages (the default) are only visible inside this project.
    ///
    /// Examples:
    ///   macdev add python@3.11          # Pure, project-local
    ///   macdev add --impure wget        # Linked system-wide
    ///   macdev add --cask firefox       # GUI application
    Add {
        /// Package specs, `name` or `name@version`
        #[arg(required = true)]
        packages: Vec<String>,

        /// Install system-wide instead of into the project profile
        #[arg(long)]
        impure: bool,

        /// Install as a cask (always system-wide)
        #[arg(long)]
        cask: bool,
    },

    /// Stop tracking packages and stage them for garbage collection
    Remove {
        /// Package specs to remove
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Install everything in the project manifest and rebuild the profile
    Install,

    /// Show everything macdev tracks for this user
    List,

    /// Install whatever the manifests list but the machine lacks
    Sync,

    /// Uninstall packages staged for removal
    Gc {
        /// Also uninstall every pure package
        #[arg(long)]
        all: bool,
    },

    /// Upgrade one package, or all tracked packages
    Upgrade {
        /// Package spec; omit to upgrade everything
        package: Option<String>,
    },

    /// Verify the project environment
    Check {
        /// Print nothing on success; only the exit status reports health
        #[arg(short, long)]
        quiet: bool,
    },

    /// Add a Homebrew tap
    Tap {
        /// Tap name, e.g. `user/repo`
        name: String,
    },

    /// Remove a Homebrew tap
    Untap {
        /// Tap name, e.g. `user/repo`
        name: String,
    },

    /// Enter a shell with the project profile on PATH
    Shell,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
