//! Shared test utilities for the macdev workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`brew`]: [`FakeBrew`], an in-memory package manager that records calls
//! - [`project`]: [`TestProject`], a scratch project plus global manifest

pub mod brew;
pub mod project;

pub use brew::FakeBrew;
pub use project::TestProject;
