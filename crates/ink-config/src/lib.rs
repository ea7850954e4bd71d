//! ink-relay configuration.
//!
//! TOML-based configuration with validation. All sections use sensible
//! defaults so partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{InkConfig, LogLevel, LoggingConfig, ServerConfig, SessionsConfig, CONFIG_SCHEMA_VERSION};

use ink_common::ConfigError;
use std::path::Path;

/// Load and validate the config.
///
/// An explicit `path` must exist. Without one, the platform default is
/// used and created with defaults on first run.
pub fn load_config(path: Option<&Path>) -> Result<InkConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}
