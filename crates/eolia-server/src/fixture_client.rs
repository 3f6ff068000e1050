//! File-backed vendor client
//!
//! Serves the inventory from a JSON array of device snapshots and writes
//! applied states back into the same file. Stands in for the cloud API on
//! local runs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use eolia_core::DeviceSnapshot;
use eolia_platform::{ClientError, ClientResult, EoliaClient};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::debug;

pub struct FixtureClient {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FixtureClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> ClientResult<Vec<DeviceSnapshot>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ClientError::Network(format!("{}: {}", self.path.display(), e)))?;

        serde_json::from_str(&content).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn write(&self, devices: &[DeviceSnapshot]) -> ClientResult<()> {
        let content = serde_json::to_string_pretty(devices)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, content)
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| ClientError::Network(e.to_string()))
    }
}

#[async_trait]
impl EoliaClient for FixtureClient {
    async fn list_devices(&self) -> ClientResult<Vec<DeviceSnapshot>> {
        self.read().await
    }

    async fn apply(&self, device: DeviceSnapshot) -> ClientResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut devices = self.read().await?;
        let Some(slot) = devices
            .iter_mut()
            .find(|d| d.appliance_id == device.appliance_id)
        else {
            return Err(ClientError::Rejected {
                detail: json!({
                    "applianceId": device.appliance_id,
                    "message": "unknown appliance",
                }),
            });
        };

        debug!(appliance_id = %device.appliance_id, "Writing device state");
        *slot = device;
        self.write(&devices).await
    }
}
