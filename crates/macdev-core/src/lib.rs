//! Core reconciliation layer for macdev
//!
//! This crate keeps four pieces of state consistent for a project:
//!
//! - **Local manifest** (`.macdev/manifest.toml`): pure packages the project needs
//! - **Global manifest** (`~/.config/macdev/manifest.toml`): everything installed
//!   for the user, classified as pure, impure or cask, plus taps and the gc set
//! - **Lock file** (`.macdev/manifest.lock`): exact versions of the local packages
//! - **Profile** (`.macdev/profile/bin`): symlinks exposing pure packages
//!
//! # Architecture
//!
//! `macdev-core` sits above the Layer 0 crates and below the CLI:
//!
//! ```text
//!                 macdev-cli
//!                     |
//!                macdev-core
//!       (manifest, resolver, lock, profile,
//!               reconcile::Engine)
//!                     |
//!          +----------+----------+
//!          |                     |
//!      macdev-fs            macdev-brew
//! ```
//!
//! # Example
//!
//! ```ignore
//! use macdev_brew::Homebrew;
//! use macdev_core::{AddOptions, Engine, EngineConfig};
//!
//! fn example() -> macdev_core::Result<()> {
//!     let config = EngineConfig::for_user("/path/to/project")?;
//!     let engine = Engine::new(config, Box::new(Homebrew::new()));
//!     engine.init()?;
//!     engine.add("python@3.11", AddOptions::pure())?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod lock;
pub mod manifest;
pub mod profile;
pub mod reconcile;
pub mod resolver;
pub mod spec;
pub mod venv;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use lock::{LockFile, LockOutcome, LockedPackage};
pub use manifest::{GlobalManifest, LocalManifest, Tracking};
pub use profile::{InterpreterLinks, Profile, RebuildReport};
pub use reconcile::{
    AddOptions, AddReport, CheckIssue, CheckReport, Engine, GcOutcome, GcReport, InitOutcome,
    InstallReport, PackageKind, RemoveReport, SyncReport, TapOutcome, UntapOutcome,
    UpgradeOutcome, UpgradeReport,
};
pub use resolver::Resolver;
pub use spec::PackageSpec;
pub use venv::VenvOutcome;
