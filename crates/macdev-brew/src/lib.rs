//! Package manager collaborator for macdev
//!
//! macdev never resolves or builds packages itself. Everything it knows
//! about installed software comes from an external package manager,
//! reached through the narrow [`PackageManager`] trait. [`Homebrew`] is
//! the live implementation that shells out to `brew`.

pub mod error;
pub mod homebrew;
pub mod manager;

pub use error::{Error, Result};
pub use homebrew::Homebrew;
pub use manager::{FormulaInfo, PackageManager, UpgradeStatus};
