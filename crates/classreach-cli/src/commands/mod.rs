//! Command implementations for the classreach CLI.
//!
//! - [`imports`] - direct references of one class file
//! - [`resolve`] - transitive closure from root classes
//! - [`check`] - configuration and classpath validation
//!
//! Each command provides an `execute` function that takes the global flags
//! and the parsed command arguments.

pub mod check;
pub mod imports;
pub mod resolve;
pub(crate) mod utils;

pub use check::execute as check_execute;
pub use imports::execute as imports_execute;
pub use resolve::execute as resolve_execute;
