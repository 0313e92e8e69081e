//! Build engine.
//!
//! This module decides which targets are stale and runs their actions.

pub mod action;
pub mod engine;
pub mod errors;

pub use action::{shell, ShellOptions};
pub use engine::{Engine, Rebuild};
pub use errors::{BuildError, BuildResult};
