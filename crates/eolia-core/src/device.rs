//! Vendor-side device snapshot

use serde::{Deserialize, Serialize};

/// Operation mode reported by (and submitted to) the air conditioner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationMode {
    Heating,
    Cooling,
    Blast,
    CoolDehumidifying,
    Auto,
    /// Any mode this bridge does not model (dryer, nanoe, ...)
    #[serde(other)]
    Unknown,
}

impl OperationMode {
    /// Modes whose thermal effect is cooling
    pub fn is_cooling(&self) -> bool {
        matches!(
            self,
            OperationMode::Cooling | OperationMode::Blast | OperationMode::CoolDehumidifying
        )
    }
}

/// A point-in-time read of one air conditioner
///
/// Identity is `appliance_id`; every other field may change between fetches.
/// JSON uses the vendor's camelCase field names, with the target set point
/// stored under `temperature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSnapshot {
    pub appliance_id: String,
    pub nickname: String,
    #[serde(default)]
    pub product_code: String,
    pub operation_status: bool,
    pub operation_mode: OperationMode,
    pub inside_temperature: f64,
    #[serde(rename = "temperature")]
    pub target_temperature: f64,
}

impl DeviceSnapshot {
    /// Create a powered-off snapshot in AUTO mode
    pub fn new(appliance_id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            appliance_id: appliance_id.into(),
            nickname: nickname.into(),
            product_code: String::new(),
            operation_status: false,
            operation_mode: OperationMode::Auto,
            inside_temperature: 0.0,
            target_temperature: 0.0,
        }
    }

    pub fn with_product_code(mut self, product_code: impl Into<String>) -> Self {
        self.product_code = product_code.into();
        self
    }

    pub fn with_operation(mut self, status: bool, mode: OperationMode) -> Self {
        self.operation_status = status;
        self.operation_mode = mode;
        self
    }

    pub fn with_temperatures(mut self, inside: f64, target: f64) -> Self {
        self.inside_temperature = inside;
        self.target_temperature = target;
        self
    }
}
