//! HeaterCooler accessory controller
//!
//! One controller per registered accessory, bound to the snapshot from the
//! most recent discovery pass. Reads are answered from that snapshot through
//! the state mapping; writes go through [`CommandApplier`].

use std::collections::HashMap;
use std::sync::Arc;

use eolia_core::mapping::{
    map_active, map_current_state, map_requested_mode, map_requested_mode_value, map_target_state,
};
use eolia_core::{
    Active, ClimateState, CommandDelta, CurrentHeaterCoolerState, DeviceSnapshot,
    RegisteredAccessory, TargetHeaterCoolerState, MANUFACTURER,
};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::command::CommandApplier;
use crate::error::ApplyError;

/// Accessory information service values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInformation {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
}

impl AccessoryInformation {
    fn for_device(device: &DeviceSnapshot) -> Self {
        Self {
            manufacturer: MANUFACTURER.to_string(),
            model: device.product_code.clone(),
            serial_number: device.appliance_id.clone(),
        }
    }
}

/// Every HeaterCooler characteristic value at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaterCoolerCharacteristics {
    pub active: Active,
    pub current_state: CurrentHeaterCoolerState,
    pub target_state: TargetHeaterCoolerState,
    pub current_temperature: f64,
}

struct ControllerState {
    device: DeviceSnapshot,
    /// Last value of the TargetHeaterCoolerState characteristic
    target_state: TargetHeaterCoolerState,
}

pub struct HeaterCooler {
    uuid: Uuid,
    name: String,
    information: AccessoryInformation,
    /// Only held for in-memory reads and updates, never across a vendor call
    state: Mutex<ControllerState>,
    /// Held across the vendor call, so commands to one device run one at a time
    command_lock: Mutex<()>,
    applier: CommandApplier,
}

impl HeaterCooler {
    /// Bind a controller to `device`, seeding characteristics from it
    pub fn new(
        accessory: &RegisteredAccessory,
        device: DeviceSnapshot,
        applier: CommandApplier,
    ) -> Self {
        let climate = ClimateState::from_snapshot(&device);
        debug!(
            uuid = %accessory.uuid,
            active = climate.active,
            current = ?climate.current_state,
            target = ?climate.target_state,
            "Seeded HeaterCooler characteristics"
        );

        Self {
            uuid: accessory.uuid,
            name: accessory.service_name().to_string(),
            information: AccessoryInformation::for_device(&device),
            state: Mutex::new(ControllerState {
                device,
                target_state: climate.target_state,
            }),
            command_lock: Mutex::new(()),
            applier,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// HeaterCooler service name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    /// Copy of the bound snapshot, including optimistic changes
    pub async fn snapshot(&self) -> DeviceSnapshot {
        self.state.lock().await.device.clone()
    }

    pub async fn characteristics(&self) -> HeaterCoolerCharacteristics {
        let state = self.state.lock().await;
        let climate = ClimateState::from_snapshot(&state.device);
        HeaterCoolerCharacteristics {
            active: Active::from(climate.active),
            current_state: climate.current_state,
            target_state: climate.target_state,
            current_temperature: state.device.inside_temperature,
        }
    }

    pub async fn get_active(&self) -> Active {
        let state = self.state.lock().await;
        Active::from(map_active(&state.device))
    }

    /// Power on or off in the mode of the last target state value
    pub async fn set_active(&self, value: Active) -> Result<(), ApplyError> {
        debug!(uuid = %self.uuid, "Set Characteristic Active -> {}", value.value());

        self.command(|state| {
            CommandDelta::power(value.is_active(), map_requested_mode(state.target_state))
        })
        .await
    }

    pub async fn get_current_heater_cooler_state(&self) -> CurrentHeaterCoolerState {
        let state = self.state.lock().await;
        map_current_state(&state.device)
    }

    pub async fn get_target_heater_cooler_state(&self) -> TargetHeaterCoolerState {
        let mut state = self.state.lock().await;
        let target = map_target_state(&state.device);
        state.target_state = target;
        target
    }

    /// Switch mode; out-of-range values request AUTO
    pub async fn set_target_heater_cooler_state(&self, value: u8) -> Result<(), ApplyError> {
        let mode = map_requested_mode_value(value);
        debug!(uuid = %self.uuid, "Set Characteristic TargetHeaterCoolerState -> {:?}", mode);

        self.command(|state| {
            state.target_state =
                TargetHeaterCoolerState::from_value(value).unwrap_or(TargetHeaterCoolerState::Auto);
            CommandDelta::mode(mode)
        })
        .await
    }

    pub async fn get_current_temperature(&self) -> f64 {
        self.state.lock().await.device.inside_temperature
    }

    /// Write a delta into the bound snapshot, then submit a copy of it
    ///
    /// Reads see the new values as soon as the delta is written, while the
    /// vendor call is still pending.
    async fn command<F>(&self, change: F) -> Result<(), ApplyError>
    where
        F: FnOnce(&mut ControllerState) -> CommandDelta,
    {
        let _command = self.command_lock.lock().await;

        let desired = {
            let mut state = self.state.lock().await;
            let delta = change(&mut *state);
            delta.apply_to(&mut state.device);
            state.device.clone()
        };

        self.applier.submit(desired).await
    }
}

/// Live controllers keyed by accessory UUID, at most one per accessory
pub struct ControllerSet {
    applier: CommandApplier,
    controllers: HashMap<Uuid, Arc<HeaterCooler>>,
}

impl ControllerSet {
    pub fn new(applier: CommandApplier) -> Self {
        Self {
            applier,
            controllers: HashMap::new(),
        }
    }

    /// Create or replace the controller for a bound accessory
    ///
    /// Returns `None` for an unbound accessory.
    pub fn bind(&mut self, accessory: &RegisteredAccessory) -> Option<Arc<HeaterCooler>> {
        let device = accessory.bound_device.clone()?;
        let controller = Arc::new(HeaterCooler::new(accessory, device, self.applier.clone()));
        self.controllers.insert(accessory.uuid, Arc::clone(&controller));
        Some(controller)
    }

    pub fn remove(&mut self, uuid: &Uuid) -> Option<Arc<HeaterCooler>> {
        self.controllers.remove(uuid)
    }

    pub fn get(&self, uuid: &Uuid) -> Option<Arc<HeaterCooler>> {
        self.controllers.get(uuid).cloned()
    }

    pub fn contains(&self, uuid: &Uuid) -> bool {
        self.controllers.contains_key(uuid)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
