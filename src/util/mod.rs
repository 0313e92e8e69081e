//! Shared utilities

pub mod config;
pub mod fs;
pub mod log;
pub mod process;
pub mod template;

pub use config::Env;
pub use log::Verbosity;
