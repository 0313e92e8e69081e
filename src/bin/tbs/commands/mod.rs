//! Command implementations

pub mod env;
pub mod files;
pub mod need;
