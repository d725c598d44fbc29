//! classreach CLI - transitive class dependency closure for JVM classpaths.
//!
//! This crate wires `classreach-graph` and `classreach-config` into the
//! `classreach` binary.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - `commands` - `imports`, `resolve` and `check`
//! - `config` - turning CLI flags into a layered [`classreach_config::ClassreachConfig`]
//! - [`error`] - `CliError` with actionable messages and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines, spinner and closure rendering
//!
//! # Example
//!
//! ```rust
//! use classreach_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     // CLI command implementations...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
