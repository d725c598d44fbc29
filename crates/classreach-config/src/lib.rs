pub mod config;
pub mod discovery;
pub mod error;
pub mod loading;
pub mod settings;
pub mod validation;

// Re-export main types
pub use config::*;
pub use error::*;
pub use settings::*;

// Re-export discovery, loading and validation
pub use discovery::{CONFIG_FILE_NAME, ConfigDiscovery};
pub use loading::{ConfigLoader, ENV_PREFIX};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_schema};
