//! Init command implementation

use colored::Colorize;
use macdev_core::{Engine, InitOutcome};

use crate::error::Result;

/// Create the project manifest unless it exists.
pub fn run_init(engine: &Engine) -> Result<()> {
    let path = engine.config().local_manifest_path();
    match engine.init()? {
        InitOutcome::Created => {
            println!("{} Created {}", "OK".green().bold(), path.display());
            println!("Run {} to add packages.", "macdev add <package>".cyan());
        }
        InitOutcome::AlreadyExists => {
            println!(
                "{} Manifest already exists at {}",
                "OK".yellow().bold(),
                path.display()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use macdev_core::EngineConfig;
    use macdev_test_utils::{FakeBrew, TestProject};

    #[test]
    fn init_is_idempotent() {
        let project = TestProject::new();
        let config = EngineConfig::new(project.root(), project.global_manifest());
        let engine = Engine::new(config, FakeBrew::new().boxed());

        run_init(&engine).unwrap();
        project.write_local("[packages]\nrust = \"*\"\n");
        run_init(&engine).unwrap();

        assert!(project.read_local().contains("rust"));
    }
}
