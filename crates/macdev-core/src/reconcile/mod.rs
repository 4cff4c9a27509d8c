//! Reconciliation Engine
//!
//! Every operation follows the same order: mutate manifests, rebuild the
//! profile when pure packages changed, then regenerate the lock. Lock
//! regeneration never changes an operation's result.

mod check;
mod classify;
mod engine;
mod maintenance;
mod report;

pub use classify::{Classification, classify, reconstruct_spec};
pub use engine::Engine;
pub use report::{
    AddOptions, AddReport, CheckIssue, CheckReport, GcOutcome, GcReport, InitOutcome,
    InstallReport, PackageKind, RemoveReport, SyncReport, TapOutcome, UntapOutcome,
    UpgradeOutcome, UpgradeReport,
};
