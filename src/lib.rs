//! tbs - a tiny make-like build engine
//!
//! This crate provides a timestamp-based incremental build engine meant to
//! be driven from a small Rust host program. The host declares targets, the
//! actions that produce them and their sources, then asks for one target to
//! be built; only stale targets are rebuilt, in dependency order.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use builder::{shell, BuildError, BuildResult, ShellOptions};
pub use self::core::{Action, Callback, Target, TargetGraph};
pub use ops::{need, App, Outcome};
pub use util::config::Env;
pub use util::fs::files;
