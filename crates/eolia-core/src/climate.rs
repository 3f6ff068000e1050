//! Host-side climate characteristics
//!
//! Numeric values follow the HomeKit HeaterCooler service definitions.

use serde::{Deserialize, Serialize};

use crate::mapping;
use crate::DeviceSnapshot;

/// `Active` characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Active {
    Inactive = 0,
    Active = 1,
}

impl Active {
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Any non-zero value turns the device on
    pub fn from_value(value: u8) -> Self {
        if value == 0 {
            Active::Inactive
        } else {
            Active::Active
        }
    }

    pub fn is_active(self) -> bool {
        self == Active::Active
    }
}

impl From<bool> for Active {
    fn from(active: bool) -> Self {
        if active {
            Active::Active
        } else {
            Active::Inactive
        }
    }
}

/// `CurrentHeaterCoolerState` characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CurrentHeaterCoolerState {
    Inactive = 0,
    Idle = 1,
    Heating = 2,
    Cooling = 3,
}

impl CurrentHeaterCoolerState {
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// `TargetHeaterCoolerState` characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TargetHeaterCoolerState {
    Auto = 0,
    Heat = 1,
    Cool = 2,
}

impl TargetHeaterCoolerState {
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Parse a raw characteristic value, `None` if out of range
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(TargetHeaterCoolerState::Auto),
            1 => Some(TargetHeaterCoolerState::Heat),
            2 => Some(TargetHeaterCoolerState::Cool),
            _ => None,
        }
    }
}

/// Externally visible climate state, derived from a [`DeviceSnapshot`]
///
/// Never stored; always recomputed. `active == false` implies
/// `current_state == Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimateState {
    pub active: bool,
    pub current_state: CurrentHeaterCoolerState,
    pub target_state: TargetHeaterCoolerState,
}

impl ClimateState {
    pub fn from_snapshot(snapshot: &DeviceSnapshot) -> Self {
        Self {
            active: mapping::map_active(snapshot),
            current_state: mapping::map_current_state(snapshot),
            target_state: mapping::map_target_state(snapshot),
        }
    }
}
