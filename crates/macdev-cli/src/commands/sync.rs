//! Sync, gc and check command implementations

use colored::Colorize;
use macdev_core::{CheckIssue, Engine, GcOutcome};

use super::print_lock;
use crate::error::{CliError, Result};

/// Install whatever the manifests list but the machine lacks.
///
/// Every pass runs; failures are listed and turn the exit status non-zero.
pub fn run_sync(engine: &Engine) -> Result<()> {
    println!("{} Syncing packages from manifests...", "=>".blue().bold());
    let report = engine.sync()?;

    for action in &report.actions {
        println!("   {} {}", "+".green(), action);
    }
    for error in &report.errors {
        println!("   {} {}", "!".red(), error);
    }

    if !report.success {
        return Err(CliError::user(format!(
            "{} sync step(s) failed",
            report.errors.len()
        )));
    }
    if report.is_noop() {
        println!("{} Everything already synced", "OK".green().bold());
    } else {
        println!(
            "{} Synced {} item(s)",
            "OK".green().bold(),
            report.actions.len()
        );
    }
    Ok(())
}

/// Uninstall staged packages. Failed uninstalls are reported and kept.
pub fn run_gc(engine: &Engine, all: bool) -> Result<()> {
    let report = match engine.gc(all)? {
        GcOutcome::NothingToCollect => {
            println!("{} Nothing to collect", "OK".green().bold());
            return Ok(());
        }
        GcOutcome::Collected(report) => report,
    };

    println!("{} Garbage collecting...", "=>".blue().bold());
    for key in &report.removed {
        println!("   {} {}", "-".red(), key);
    }
    for (key, reason) in &report.failed {
        println!("   {} {}: {} (kept for next run)", "!".yellow(), key, reason);
    }
    if !report.cleaned {
        println!("   {} brew cleanup failed", "!".yellow());
    }
    if let Some(lock) = &report.lock {
        print_lock(lock);
    }

    println!(
        "{} Uninstalled {} package(s)",
        "OK".green().bold(),
        report.removed.len()
    );
    Ok(())
}

/// Verify the project; any issue makes the exit status non-zero.
pub fn run_check(engine: &Engine, quiet: bool) -> Result<()> {
    let report = engine.check()?;

    if !quiet {
        println!("{} Checking environment...", "=>".blue().bold());
        for issue in &report.issues {
            println!("   {} {}", "!".red(), issue);
            if let CheckIssue::ManifestMissing { .. } = issue {
                println!("     Run {} first.", "macdev init".cyan());
            }
        }
        if let Some(lock) = &report.lock {
            print_lock(lock);
        }
    }

    if !report.is_healthy() {
        return Err(CliError::CheckFailed {
            count: report.issues.len(),
        });
    }

    if !quiet {
        println!("{} Environment is healthy", "OK".green().bold());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use macdev_core::EngineConfig;
    use macdev_test_utils::{FakeBrew, TestProject};

    fn engine(project: &TestProject, brew: &FakeBrew) -> Engine {
        let config = EngineConfig::new(project.root(), project.global_manifest()).with_venv(false);
        Engine::new(config, brew.boxed())
    }

    #[test]
    fn check_fails_when_package_missing() {
        let project = TestProject::with_local("[packages]\nrust = \"*\"\n");
        let brew = FakeBrew::new();

        let err = run_check(&engine(&project, &brew), true).unwrap_err();
        assert!(matches!(err, CliError::CheckFailed { count: 2 }));
    }

    #[test]
    fn gc_partial_failure_is_not_an_error() {
        let project = TestProject::new();
        project.write_global("[gc]\nrust = \"*\"\n");
        let brew = FakeBrew::new();
        brew.fail("rust");

        run_gc(&engine(&project, &brew), false).unwrap();
        assert!(project.read_global().contains("rust"));
    }

    #[test]
    fn sync_failure_sets_exit_status() {
        let project = TestProject::with_local("[packages]\nrust = \"*\"\n");
        let brew = FakeBrew::new();
        brew.fail("rust");

        assert!(run_sync(&engine(&project, &brew)).is_err());
    }
}
