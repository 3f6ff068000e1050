//! Configuration errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Well-formed YAML that does not describe a platform
    #[error("{} is not a valid Eolia platform config: {source}", .path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no secret named '{0}'")]
    MissingSecret(String),

    #[error("environment variable '{0}' is not set")]
    MissingEnvVar(String),

    #[error("{tag} expects a string argument, got {found}")]
    BadTagArgument { tag: &'static str, found: String },

    #[error("{} is included from itself", .0.display())]
    IncludeCycle(PathBuf),

    #[error("invalid platform config: {0}")]
    Invalid(String),
}
