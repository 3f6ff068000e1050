//! `secrets.yaml` lookups for `!secret` tags

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

pub const SECRETS_FILE: &str = "secrets.yaml";

/// Flat key/value secrets; scalars are kept in their string form
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    values: HashMap<String, String>,
}

impl Secrets {
    /// Read `secrets.yaml` from `config_dir`, empty if the file is absent
    pub fn load(config_dir: &Path) -> ConfigResult<Self> {
        let path = config_dir.join(SECRETS_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No {} in {}", SECRETS_FILE, config_dir.display());
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: HashMap<String, Value> =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.clone(),
                source,
            })?;

        let values: HashMap<String, String> = raw
            .into_iter()
            .filter_map(|(key, value)| scalar_string(value).map(|s| (key, s)))
            .collect();

        debug!("Loaded {} secrets", values.len());
        Ok(Self { values })
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &str) -> ConfigResult<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingSecret(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Numeric passwords and PINs come through as numbers
fn scalar_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scalars_become_strings() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(SECRETS_FILE),
            "eolia_user: someone@example.com\neolia_password: hunter2\npin: 1234\nnested: [1, 2]\n",
        )
        .unwrap();

        let secrets = Secrets::load(dir.path()).unwrap();
        assert_eq!(secrets.get("eolia_user").unwrap(), "someone@example.com");
        assert_eq!(secrets.get("pin").unwrap(), "1234");
        assert_eq!(secrets.len(), 3);
        assert!(matches!(
            secrets.get("nested"),
            Err(ConfigError::MissingSecret(_))
        ));
    }

    #[test]
    fn test_absent_or_empty_file() {
        let dir = TempDir::new().unwrap();
        assert!(Secrets::load(dir.path()).unwrap().is_empty());

        fs::write(dir.path().join(SECRETS_FILE), "\n").unwrap();
        assert!(Secrets::load(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SECRETS_FILE), "key: [unclosed\n").unwrap();

        assert!(matches!(
            Secrets::load(dir.path()),
            Err(ConfigError::Yaml { .. })
        ));
    }
}
