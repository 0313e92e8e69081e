//! Core data structures for tbs.
//!
//! - Targets and their actions
//! - The target graph (registry)

pub mod graph;
pub mod target;

pub use graph::TargetGraph;
pub use target::{Action, Callback, CallbackFn, Target};
