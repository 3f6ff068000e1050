//! Registered accessory record

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DeviceSnapshot;

/// One physical device as registered with the host
///
/// `bound_device` is only present while the device appears in the latest
/// inventory. Restored records start unbound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredAccessory {
    pub uuid: Uuid,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound_device: Option<DeviceSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl RegisteredAccessory {
    pub fn new(uuid: Uuid, display_name: impl Into<String>) -> Self {
        Self {
            uuid,
            display_name: display_name.into(),
            bound_device: None,
            nickname: None,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound_device.is_some()
    }

    /// Appliance id of the bound device, if any
    pub fn appliance_id(&self) -> Option<&str> {
        self.bound_device.as_ref().map(|d| d.appliance_id.as_str())
    }

    /// Name for the HeaterCooler service: stored nickname, else display name
    pub fn service_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.display_name)
    }
}
