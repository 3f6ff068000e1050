//! Core types for the Eolia bridge
//!
//! This crate provides the fundamental types shared by the rest of the
//! workspace: the vendor-side [`DeviceSnapshot`], the host-side
//! [`RegisteredAccessory`], the derived [`ClimateState`], and the pure
//! mapping functions that translate between them.

mod accessory;
mod accessory_id;
mod climate;
mod command;
mod device;
pub mod mapping;

pub use accessory::RegisteredAccessory;
pub use accessory_id::{accessory_uuid, ACCESSORY_NAMESPACE};
pub use climate::{Active, ClimateState, CurrentHeaterCoolerState, TargetHeaterCoolerState};
pub use command::CommandDelta;
pub use device::{DeviceSnapshot, OperationMode};

/// Manufacturer reported in the accessory information service
pub const MANUFACTURER: &str = "Panasonic";
