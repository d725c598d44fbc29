//! Configuration for CLI runs.
//!
//! Merges settings from CLI args, environment variables, and classreach.toml.
//! Priority: CLI > Environment > Profile > File > Defaults

mod conversions;
mod loading;

pub use conversions::{CliOverrides, ClasspathOverride, FilterOverride, ResolveOverride};
pub use loading::{LoadedConfig, load};
