//! High-level operations used by host programs.

pub mod app;
pub mod need;

pub use app::{App, Handler, Outcome};
pub use need::{need, NeedError, ToolStatus};
