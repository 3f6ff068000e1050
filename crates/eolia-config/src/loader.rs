//! Tag-aware YAML loading
//!
//! `!include <path>` splices in another file, resolved against the directory
//! of the file that includes it. `!secret <key>` reads `secrets.yaml` and
//! `!env_var <NAME>` reads the process environment. Other tags pass through.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};
use tracing::{debug, trace};

use crate::error::{ConfigError, ConfigResult};
use crate::secrets::Secrets;

#[derive(Debug, Clone, Copy)]
enum Tag {
    Include,
    Secret,
    EnvVar,
}

impl Tag {
    fn parse(tagged: &TaggedValue) -> Option<Self> {
        match tagged.tag.to_string().trim_start_matches('!') {
            "include" => Some(Tag::Include),
            "secret" => Some(Tag::Secret),
            "env_var" => Some(Tag::EnvVar),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Tag::Include => "!include",
            Tag::Secret => "!secret",
            Tag::EnvVar => "!env_var",
        }
    }
}

pub struct YamlLoader {
    config_dir: PathBuf,
    secrets: Secrets,
    /// Files on the current include path, outermost first
    chain: Vec<PathBuf>,
}

impl YamlLoader {
    pub fn new(config_dir: impl Into<PathBuf>) -> ConfigResult<Self> {
        let config_dir = config_dir.into();
        let secrets = Secrets::load(&config_dir)?;
        Ok(Self::with_secrets(config_dir, secrets))
    }

    pub fn with_secrets(config_dir: impl Into<PathBuf>, secrets: Secrets) -> Self {
        Self {
            config_dir: config_dir.into(),
            secrets,
            chain: Vec::new(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load a file and expand every tag in it
    ///
    /// Relative paths resolve against the config directory.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<Value> {
        let path = absolute(&self.config_dir, path.as_ref());
        if self.chain.contains(&path) {
            return Err(ConfigError::IncludeCycle(path));
        }
        debug!("Loading {}", path.display());

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let value: Value = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.clone(),
            source,
        })?;

        self.chain.push(path);
        let expanded = self.expand(value);
        self.chain.pop();
        expanded
    }

    fn expand(&mut self, value: Value) -> ConfigResult<Value> {
        match value {
            Value::Tagged(tagged) => match Tag::parse(&tagged) {
                Some(tag) => self.expand_tag(tag, tagged.value),
                None => {
                    let TaggedValue { tag, value } = *tagged;
                    let value = self.expand(value)?;
                    Ok(Value::Tagged(Box::new(TaggedValue { tag, value })))
                }
            },
            Value::Mapping(map) => {
                let mut expanded = Mapping::with_capacity(map.len());
                for (key, value) in map {
                    expanded.insert(key, self.expand(value)?);
                }
                Ok(Value::Mapping(expanded))
            }
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| self.expand(item))
                .collect::<ConfigResult<Vec<_>>>()
                .map(Value::Sequence),
            other => Ok(other),
        }
    }

    fn expand_tag(&mut self, tag: Tag, argument: Value) -> ConfigResult<Value> {
        let Value::String(argument) = argument else {
            return Err(ConfigError::BadTagArgument {
                tag: tag.name(),
                found: format!("{:?}", argument),
            });
        };
        trace!("Expanding {} {}", tag.name(), argument);

        match tag {
            Tag::Include => {
                let base = self
                    .chain
                    .last()
                    .and_then(|p| p.parent())
                    .unwrap_or(&self.config_dir);
                let target = absolute(base, Path::new(&argument));
                self.load_file(target)
            }
            Tag::Secret => Ok(Value::String(self.secrets.get(&argument)?.to_string())),
            Tag::EnvVar => std::env::var(&argument)
                .map(Value::String)
                .map_err(|_| ConfigError::MissingEnvVar(argument)),
        }
    }
}

fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Load `file` from `config_dir` with tag expansion
pub fn load_yaml(config_dir: impl Into<PathBuf>, file: impl AsRef<Path>) -> ConfigResult<Value> {
    YamlLoader::new(config_dir)?.load_file(file)
}
