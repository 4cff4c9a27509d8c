//! Filesystem primitives for macdev
//!
//! Provides atomic file writes, idempotent symlink handling and the
//! well-known paths of a macdev project.

pub mod constants;
pub mod error;
pub mod io;
pub mod link;

pub use constants::ProjectPath;
pub use error::{Error, Result};
