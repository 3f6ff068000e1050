//! Command deltas applied to a device snapshot before submission

use serde::{Deserialize, Serialize};

use crate::{DeviceSnapshot, OperationMode};

/// The desired-state fields a command changes; `None` leaves a field as is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDelta {
    pub operation_status: Option<bool>,
    pub operation_mode: Option<OperationMode>,
}

impl CommandDelta {
    pub fn new(operation_status: Option<bool>, operation_mode: Option<OperationMode>) -> Self {
        Self {
            operation_status,
            operation_mode,
        }
    }

    /// Power the device on or off in the given mode
    pub fn power(active: bool, mode: OperationMode) -> Self {
        Self::new(Some(active), Some(mode))
    }

    /// Switch mode without touching power
    pub fn mode(mode: OperationMode) -> Self {
        Self::new(None, Some(mode))
    }

    pub fn is_empty(&self) -> bool {
        self.operation_status.is_none() && self.operation_mode.is_none()
    }

    /// Write the delta into `snapshot`
    pub fn apply_to(&self, snapshot: &mut DeviceSnapshot) {
        if let Some(status) = self.operation_status {
            snapshot.operation_status = status;
        }
        if let Some(mode) = self.operation_mode {
            snapshot.operation_mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_power() {
        let mut snapshot = DeviceSnapshot::new("A1", "Room");
        CommandDelta::power(true, OperationMode::Heating).apply_to(&mut snapshot);

        assert!(snapshot.operation_status);
        assert_eq!(snapshot.operation_mode, OperationMode::Heating);
    }

    #[test]
    fn test_mode_keeps_status() {
        let mut snapshot =
            DeviceSnapshot::new("A1", "Room").with_operation(true, OperationMode::Auto);
        CommandDelta::mode(OperationMode::Cooling).apply_to(&mut snapshot);

        assert!(snapshot.operation_status);
        assert_eq!(snapshot.operation_mode, OperationMode::Cooling);
    }

    #[test]
    fn test_empty_delta() {
        let delta = CommandDelta::default();
        assert!(delta.is_empty());

        let before = DeviceSnapshot::new("A1", "Room").with_temperatures(21.0, 23.0);
        let mut after = before.clone();
        delta.apply_to(&mut after);
        assert_eq!(before, after);
    }
}
