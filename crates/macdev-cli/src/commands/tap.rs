//! Tap command implementations

use colored::Colorize;
use macdev_core::{Engine, TapOutcome, UntapOutcome};

use crate::error::Result;

pub fn run_tap(engine: &Engine, name: &str) -> Result<()> {
    match engine.tap(name)? {
        TapOutcome::Tapped => println!("{} Tapped {}", "OK".green().bold(), name.cyan()),
        TapOutcome::AlreadyTapped => {
            println!("{} {} already tapped", "OK".green().bold(), name.cyan())
        }
    }
    Ok(())
}

pub fn run_untap(engine: &Engine, name: &str) -> Result<()> {
    match engine.untap(name)? {
        UntapOutcome::Untapped => println!("{} Untapped {}", "OK".green().bold(), name.cyan()),
        UntapOutcome::NotTapped => {
            println!("{} {} was not tapped", "OK".yellow().bold(), name.cyan())
        }
    }
    Ok(())
}
