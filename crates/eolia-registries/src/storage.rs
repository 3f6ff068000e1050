//! Versioned JSON files under `<config_dir>/.storage/`

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("storage file {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage file {key} has version {found}, this build reads version {supported}")]
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// On-disk envelope
///
/// ```json
/// { "version": 1, "minor_version": 1, "key": "eolia.accessories", "data": { ... } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageFile<T> {
    /// Bumped on incompatible layout changes
    pub version: u32,
    /// Bumped when fields are added
    pub minor_version: u32,
    pub key: String,
    pub data: T,
}

/// A payload stored under a fixed key
pub trait Storable: Serialize + DeserializeOwned {
    const KEY: &'static str;
    const VERSION: u32;
    const MINOR_VERSION: u32;
}

#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: config_dir.as_ref().join(".storage"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read `T`'s file, `None` if it has never been written
    ///
    /// A different major version is refused; an older minor version is read
    /// with missing fields defaulted.
    pub async fn read<T: Storable>(&self) -> StorageResult<Option<StorageFile<T>>> {
        let path = self.path_for(T::KEY);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        let corrupt = |source| StorageError::Corrupt {
            key: T::KEY.to_string(),
            source,
        };
        let envelope: StorageFile<serde_json::Value> =
            serde_json::from_str(&content).map_err(corrupt)?;

        if envelope.version != T::VERSION {
            return Err(StorageError::UnsupportedVersion {
                key: T::KEY.to_string(),
                found: envelope.version,
                supported: T::VERSION,
            });
        }
        if envelope.minor_version < T::MINOR_VERSION {
            warn!(
                key = T::KEY,
                "Reading older storage layout {}.{}",
                envelope.version,
                envelope.minor_version
            );
        }

        let data = serde_json::from_value(envelope.data).map_err(corrupt)?;
        Ok(Some(StorageFile {
            version: envelope.version,
            minor_version: envelope.minor_version,
            key: envelope.key,
            data,
        }))
    }

    /// Replace `T`'s file atomically (temp file, then rename)
    pub async fn write<T: Storable>(&self, data: &T) -> StorageResult<()> {
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StorageError::Io { path, source }
        };

        fs::create_dir_all(&self.dir)
            .await
            .map_err(io_error(&self.dir))?;

        let envelope = StorageFile {
            version: T::VERSION,
            minor_version: T::MINOR_VERSION,
            key: T::KEY.to_string(),
            data,
        };
        let content = serde_json::to_string_pretty(&envelope).map_err(|source| {
            StorageError::Corrupt {
                key: T::KEY.to_string(),
                source,
            }
        })?;

        let path = self.path_for(T::KEY);
        let temp_path = self.path_for(&format!("{}.tmp", T::KEY));
        fs::write(&temp_path, content)
            .await
            .map_err(io_error(&temp_path))?;
        fs::rename(&temp_path, &path)
            .await
            .map_err(io_error(&path))?;

        debug!(key = T::KEY, "Wrote storage file");
        Ok(())
    }
}
