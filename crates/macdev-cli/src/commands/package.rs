//! add, remove, install, list and upgrade

use colored::Colorize;
use macdev_core::{AddOptions, Engine, PackageKind, UpgradeOutcome, VenvOutcome};

use super::print_lock;
use crate::error::Result;

/// Add packages one by one; the first failure stops the run.
pub fn run_add(engine: &Engine, packages: &[String], options: AddOptions) -> Result<()> {
    if options.cask && !options.impure {
        println!(
            "{} Casks are always installed system-wide",
            "note:".yellow().bold()
        );
    }

    for raw in packages {
        println!("{} Adding {} ({})", "=>".blue().bold(), raw.cyan(), options.kind());
        let report = engine.add(raw, options)?;

        if report.restored_from_gc {
            println!("   Restored {} from gc", report.spec);
        }
        for dep in &report.unlinked_dependencies {
            println!("   Unlinked dependency {}", dep.dimmed());
        }
        if let Some(links) = &report.interpreter {
            println!("   python -> {}", links.interpreter.cyan());
        }
        match &report.venv {
            Some(VenvOutcome::Created) => println!("   Created {}", ".macdev/venv".cyan()),
            Some(VenvOutcome::Failed(reason)) => {
                println!("   {} Could not create venv: {}", "!".yellow(), reason)
            }
            _ => {}
        }
        if let Some(lock) = &report.lock {
            print_lock(lock);
        }

        let scope = match report.kind {
            PackageKind::Pure => "isolated to this project",
            PackageKind::Impure | PackageKind::Cask => "available system-wide",
        };
        println!("{} {} {}", "OK".green().bold(), report.spec, scope);
    }
    Ok(())
}

pub fn run_remove(engine: &Engine, packages: &[String]) -> Result<()> {
    for raw in packages {
        println!("{} Removing {}", "=>".blue().bold(), raw.cyan());
        let report = engine.remove(raw)?;
        if report.removed_locally {
            println!("   Removed from project manifest");
        }
        if let Some(lock) = &report.lock {
            print_lock(lock);
        }
        println!(
            "{} Removed {} ({}), staged {} for gc",
            "OK".green().bold(),
            report.spec,
            report.kind,
            report.gc_key.yellow()
        );
    }
    println!("Run {} to uninstall.", "macdev gc".cyan());
    Ok(())
}

pub fn run_install(engine: &Engine) -> Result<()> {
    println!("{} Installing packages from manifest...", "=>".blue().bold());
    let report = engine.install()?;

    for spec in &report.installed {
        println!("   {} {}", "+".green(), spec);
    }
    for spec in &report.rebuild.skipped {
        println!("   {} {} has no install prefix", "!".yellow(), spec);
    }
    if let Some(VenvOutcome::Created) = &report.venv {
        println!("   Created {}", ".macdev/venv".cyan());
    }
    print_lock(&report.lock);

    println!(
        "{} {} package(s) installed",
        "OK".green().bold(),
        report.installed.len()
    );
    Ok(())
}

pub fn run_list(engine: &Engine) -> Result<()> {
    let global = engine.list();
    let path = engine.config().global_manifest_path();
    println!("{} {}", "Global manifest:".bold(), path.display());

    let mut empty = true;
    let pure: Vec<String> = global
        .pure()
        .map(|(key, version)| match version {
            "*" => key.to_string(),
            v => format!("{key} = {v}"),
        })
        .collect();
    let sections = [
        ("Pure packages", pure),
        ("Impure packages", global.impure().map(String::from).collect()),
        ("Casks", global.casks().map(String::from).collect()),
        ("Taps", global.taps().iter().cloned().collect()),
        (
            "Staged for gc",
            global.gc().iter().map(|(k, v)| format!("{k} = {v}")).collect(),
        ),
    ];

    for (title, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        empty = false;
        println!();
        println!("{}", title.green().bold());
        for entry in entries {
            println!("   {entry}");
        }
    }

    if empty {
        println!("No packages tracked.");
    }
    Ok(())
}

pub fn run_upgrade(engine: &Engine, package: Option<&str>) -> Result<()> {
    match package {
        Some(spec) => println!("{} Upgrading {}", "=>".blue().bold(), spec.cyan()),
        None => println!("{} Upgrading all packages...", "=>".blue().bold()),
    }

    let report = match engine.upgrade(package)? {
        UpgradeOutcome::NothingToUpgrade => {
            println!("{} No packages to upgrade", "OK".green().bold());
            return Ok(());
        }
        UpgradeOutcome::Upgraded(report) => report,
    };

    for spec in &report.upgraded {
        println!("   {} {}", "+".green(), spec);
    }
    for spec in &report.up_to_date {
        println!("   {} {} already up to date", "=".dimmed(), spec);
    }
    for (spec, reason) in &report.failed {
        println!("   {} {}: {}", "!".red(), spec, reason);
    }
    if report.profile_rebuilt {
        println!("   Profile rebuilt");
    }
    if let Some(lock) = &report.lock {
        print_lock(lock);
    }
    if report.interpreter_hint {
        println!(
            "{} Python was upgraded; recreate {} if it stops working",
            "note:".yellow().bold(),
            ".macdev/venv".cyan()
        );
    }

    println!(
        "{} {} package(s) upgraded",
        "OK".green().bold(),
        report.upgraded.len()
    );
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
    fn add_then_remove_multiple() {
        let project = TestProject::with_local("[packages]\n");
        let brew = FakeBrew::new();
        let engine = engine(&project, &brew);

        run_add(&engine, &["rust".into(), "go".into()], AddOptions::pure()).unwrap();
        assert_eq!(project.profile_links(), vec!["go", "rust"]);

        run_remove(&engine, &["rust".into()]).unwrap();
        assert_eq!(project.profile_links(), vec!["go"]);
        assert!(project.read_global().contains("[gc]"));
    }

    #[test]
    fn add_stops_at_first_failure() {
        let project = TestProject::with_local("[packages]\n");
        let brew = FakeBrew::new();
        brew.fail("broken");

        let result = run_add(
            &engine(&project, &brew),
            &["broken".into(), "rust".into()],
            AddOptions::pure(),
        );

        assert!(result.is_err());
        assert_eq!(brew.count("install rust"), 0);
    }

    #[test]
    fn upgrade_with_nothing_tracked_succeeds() {
        let project = TestProject::new();
        let brew = FakeBrew::new();
        run_upgrade(&engine(&project, &brew), None).unwrap();
        assert!(brew.calls().is_empty());
    }
}
