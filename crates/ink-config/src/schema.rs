//! Configuration schema types for the ink relay.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod server;
mod sessions;
mod system;

pub use server::*;
pub use sessions::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InkConfig {
    pub server: ServerConfig,
    pub sessions: SessionsConfig,
    pub logging: LoggingConfig,
}
