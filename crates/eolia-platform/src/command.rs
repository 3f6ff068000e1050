//! Command submission

use std::sync::Arc;

use eolia_core::{CommandDelta, DeviceSnapshot, OperationMode};
use tracing::{debug, error, instrument};

use crate::client::EoliaClient;
use crate::error::ApplyError;

/// Applies desired-state changes to a device snapshot and submits it
///
/// The change is written to the snapshot before the vendor call and stays
/// there whether or not the call succeeds.
#[derive(Clone)]
pub struct CommandApplier {
    client: Arc<dyn EoliaClient>,
}

impl CommandApplier {
    pub fn new(client: Arc<dyn EoliaClient>) -> Self {
        Self { client }
    }

    /// Set power and/or mode, then submit the full snapshot
    pub async fn request_state_change(
        &self,
        device: &mut DeviceSnapshot,
        desired_active: Option<bool>,
        desired_mode: Option<OperationMode>,
    ) -> Result<(), ApplyError> {
        self.apply_delta(device, CommandDelta::new(desired_active, desired_mode))
            .await
    }

    /// Write `delta` into `device`, then submit the result
    pub async fn apply_delta(
        &self,
        device: &mut DeviceSnapshot,
        delta: CommandDelta,
    ) -> Result<(), ApplyError> {
        delta.apply_to(device);
        self.submit(device.clone()).await
    }

    /// Send a full desired snapshot to the vendor
    #[instrument(skip(self, device), fields(appliance_id = %device.appliance_id))]
    pub async fn submit(&self, device: DeviceSnapshot) -> Result<(), ApplyError> {
        let appliance_id = device.appliance_id.clone();
        let (operation_status, operation_mode) = (device.operation_status, device.operation_mode);

        match self.client.apply(device).await {
            Ok(()) => {
                debug!(operation_status, operation_mode = ?operation_mode, "Applied AC state");
                Ok(())
            }
            Err(e) => {
                error!("Error while applying AC state {}", e.detail());
                Err(ApplyError {
                    appliance_id,
                    source: e,
                })
            }
        }
    }
}
