//! YAML configuration loading for the Eolia bridge
//!
//! Supported custom tags:
//!
//! - `!include path` - Include another YAML file
//! - `!secret key` - Substitute from secrets.yaml
//! - `!env_var VAR` - Environment variable substitution
//!
//! # Example
//!
//! ```ignore
//! use eolia_config::PlatformConfig;
//!
//! let config = PlatformConfig::load("/config", "configuration.yaml")?;
//! for entry in config.nickname_entries() {
//!     println!("{} -> {}", entry.nickname, entry.alias);
//! }
//! ```

mod error;
mod loader;
mod platform;
mod secrets;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_yaml, YamlLoader};
pub use platform::{PlatformConfig, RenameEntry, DEFAULT_CONFIG_FILE, DEFAULT_PLATFORM_NAME};
pub use secrets::{Secrets, SECRETS_FILE};

pub use serde_yaml::Value;
