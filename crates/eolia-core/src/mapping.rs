//! State mapping between the vendor device model and the HeaterCooler service
//!
//! All functions are total. Modes outside the modelled set fall back to
//! `Inactive` / `Auto` without error.

use crate::{CurrentHeaterCoolerState, DeviceSnapshot, OperationMode, TargetHeaterCoolerState};

/// True iff the device reports it is running
pub fn map_active(snapshot: &DeviceSnapshot) -> bool {
    snapshot.operation_status
}

/// Derive what the device is currently doing from mode and temperatures
pub fn map_current_state(snapshot: &DeviceSnapshot) -> CurrentHeaterCoolerState {
    if !snapshot.operation_status {
        return CurrentHeaterCoolerState::Inactive;
    }

    let inside = snapshot.inside_temperature;
    let target = snapshot.target_temperature;

    match snapshot.operation_mode {
        OperationMode::Heating => {
            if inside < target {
                CurrentHeaterCoolerState::Heating
            } else {
                CurrentHeaterCoolerState::Idle
            }
        }
        mode if mode.is_cooling() => {
            if inside > target {
                CurrentHeaterCoolerState::Cooling
            } else {
                CurrentHeaterCoolerState::Idle
            }
        }
        // Both comparisons are against one degree below the set point.
        OperationMode::Auto => {
            if inside > target - 1.0 {
                CurrentHeaterCoolerState::Cooling
            } else if inside < target - 1.0 {
                CurrentHeaterCoolerState::Heating
            } else {
                CurrentHeaterCoolerState::Idle
            }
        }
        _ => CurrentHeaterCoolerState::Inactive,
    }
}

/// Derive the target state shown to the host
pub fn map_target_state(snapshot: &DeviceSnapshot) -> TargetHeaterCoolerState {
    if !snapshot.operation_status {
        return TargetHeaterCoolerState::Auto;
    }

    match snapshot.operation_mode {
        OperationMode::Heating => TargetHeaterCoolerState::Heat,
        mode if mode.is_cooling() => TargetHeaterCoolerState::Cool,
        _ => TargetHeaterCoolerState::Auto,
    }
}

/// Inverse of [`map_target_state`], used when issuing commands
///
/// Lossy: `Blast` and `CoolDehumidifying` can be observed but never requested.
pub fn map_requested_mode(target: TargetHeaterCoolerState) -> OperationMode {
    match target {
        TargetHeaterCoolerState::Heat => OperationMode::Heating,
        TargetHeaterCoolerState::Cool => OperationMode::Cooling,
        TargetHeaterCoolerState::Auto => OperationMode::Auto,
    }
}

/// Like [`map_requested_mode`] for a raw characteristic value; unrecognized values map to `Auto`
pub fn map_requested_mode_value(value: u8) -> OperationMode {
    TargetHeaterCoolerState::from_value(value)
        .map(map_requested_mode)
        .unwrap_or(OperationMode::Auto)
}
