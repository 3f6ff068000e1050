//! Typed platform configuration

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::loader::YamlLoader;

/// File loaded when no other name is given
pub const DEFAULT_CONFIG_FILE: &str = "configuration.yaml";

/// Platform name used when the config does not set one
pub const DEFAULT_PLATFORM_NAME: &str = "Panasonic Eolia";

/// One row of the rename table: factory nickname -> display alias
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenameEntry {
    pub nickname: String,
    pub alias: String,
}

/// Platform configuration
///
/// Keys are snake_case; the camelCase spellings used by existing plugin
/// configs (`userId`, `airConditionerRename`, ...) are accepted as aliases.
#[derive(Clone, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "default_name")]
    pub name: String,

    /// Vendor account id
    #[serde(alias = "userId")]
    pub user_id: String,

    /// Vendor account password
    pub password: String,

    /// Ordered rename table; later rows win for the same nickname
    #[serde(default, alias = "airConditionerRename")]
    pub air_conditioner_rename: Vec<RenameEntry>,

    /// Seconds between discovery passes, 0 = startup only
    #[serde(default, alias = "discoveryIntervalSecs")]
    pub discovery_interval_secs: u64,

    /// JSON inventory for the file-backed client
    #[serde(default, alias = "devicesFile")]
    pub devices_file: Option<PathBuf>,
}

fn default_name() -> String {
    DEFAULT_PLATFORM_NAME.to_string()
}

impl fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("name", &self.name)
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .field("air_conditioner_rename", &self.air_conditioner_rename)
            .field("discovery_interval_secs", &self.discovery_interval_secs)
            .field("devices_file", &self.devices_file)
            .finish()
    }
}

impl PlatformConfig {
    /// Load, tag-process, deserialize and validate a config file
    pub fn load(config_dir: impl Into<PathBuf>, file: impl AsRef<Path>) -> ConfigResult<Self> {
        let mut loader = YamlLoader::new(config_dir)?;
        let path = loader.config_dir().join(file.as_ref());
        let value = loader.load_file(&path)?;

        let config: PlatformConfig =
            serde_yaml::from_value(value).map_err(|e| ConfigError::Schema {
                path: path.clone(),
                source: e,
            })?;
        config.validate()?;

        debug!(
            name = %config.name,
            renames = config.air_conditioner_rename.len(),
            "Loaded platform configuration"
        );
        Ok(config)
    }

    /// Parse from a YAML string without tag processing
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: PlatformConfig =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Schema {
                path: PathBuf::from("<string>"),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(ConfigError::Invalid("user_id must not be empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(ConfigError::Invalid("password must not be empty".to_string()));
        }
        Ok(())
    }

    /// Rename table rows in configuration order
    pub fn nickname_entries(&self) -> &[RenameEntry] {
        &self.air_conditioner_rename
    }

    /// Resolve `devices_file` against the config directory
    pub fn devices_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.devices_file.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                config_dir.join(p)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = PlatformConfig::from_yaml_str("user_id: me\npassword: pw\n").unwrap();
        assert_eq!(config.name, DEFAULT_PLATFORM_NAME);
        assert!(config.nickname_entries().is_empty());
        assert_eq!(config.discovery_interval_secs, 0);
        assert!(config.devices_file.is_none());
    }

    #[test]
    fn test_camel_case_aliases() {
        let config = PlatformConfig::from_yaml_str(
            r#"
name: Eolia
userId: me
password: pw
airConditionerRename:
  - nickname: Living Room
    alias: Lounge
  - nickname: Bedroom
    alias: Master
"#,
        )
        .unwrap();

        assert_eq!(config.user_id, "me");
        assert_eq!(config.nickname_entries().len(), 2);
        assert_eq!(config.nickname_entries()[0].alias, "Lounge");
    }

    #[test]
    fn test_empty_user_id_rejected() {
        let result = PlatformConfig::from_yaml_str("user_id: ' '\npassword: pw\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_password_is_schema_error() {
        let result = PlatformConfig::from_yaml_str("user_id: me\n");
        assert!(matches!(result, Err(ConfigError::Schema { .. })));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = PlatformConfig::from_yaml_str("user_id: me\npassword: hunter2\n").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_load_with_secret_and_devices_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("secrets.yaml"), "eolia_password: s3cret\n").unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "user_id: me\npassword: !secret eolia_password\ndevices_file: devices.json\ndiscovery_interval_secs: 60\n",
        )
        .unwrap();

        let config = PlatformConfig::load(dir.path(), DEFAULT_CONFIG_FILE).unwrap();
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.discovery_interval_secs, 60);
        assert_eq!(
            config.devices_path(dir.path()),
            Some(dir.path().join("devices.json"))
        );
    }
}
