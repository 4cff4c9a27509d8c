//! Command implementations for macdev-cli
//!
//! Each command takes a ready [`macdev_core::Engine`] and prints its
//! progress. Warnings go through `tracing`; results go to stdout.

pub mod init;
pub mod package;
pub mod shell;
pub mod sync;
pub mod tap;

pub use init::run_init;
pub use package::{run_add, run_install, run_list, run_remove, run_upgrade};
pub use shell::run_shell;
pub use sync::{run_check, run_gc, run_sync};
pub use tap::{run_tap, run_untap};

use colored::Colorize;
use macdev_core::LockOutcome;

/// One line describing what happened to the lock file.
pub(crate) fn print_lock(outcome: &LockOutcome) {
    match outcome {
        LockOutcome::Written {
            packages,
            dependencies,
        } => println!(
            "   {}",
            format!("Lock file updated ({packages} packages, {dependencies} dependencies)").dimmed()
        ),
        LockOutcome::Removed => println!("   {}", "Lock file removed".dimmed()),
        LockOutcome::Absent => {}
        LockOutcome::Failed(reason) => {
            println!("   {} Lock file not updated: {}", "!".yellow(), reason)
        }
    }
}
