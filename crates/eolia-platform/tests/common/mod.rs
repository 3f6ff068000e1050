//! Test doubles for the platform integration tests
//!
//! `MockClient` serves a scripted inventory and records applies;
//! `RecordingHost` records every registry call in order.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use eolia_core::{DeviceSnapshot, OperationMode, RegisteredAccessory};
use eolia_platform::{ClientError, ClientResult, EoliaClient};
use eolia_registries::{AccessoryHost, RegistryError, RegistryResult};
use serde_json::json;
use tokio::sync::Notify;
use uuid::Uuid;

pub fn device(appliance_id: &str, nickname: &str) -> DeviceSnapshot {
    DeviceSnapshot::new(appliance_id, nickname)
        .with_product_code("CS-X280D")
        .with_operation(true, OperationMode::Cooling)
        .with_temperatures(27.0, 25.0)
}

#[derive(Default)]
pub struct MockClient {
    devices: Mutex<Vec<DeviceSnapshot>>,
    list_failures: Mutex<VecDeque<ClientError>>,
    apply_failures: Mutex<VecDeque<ClientError>>,
    applied: Mutex<Vec<DeviceSnapshot>>,
    held: Mutex<HashMap<String, Arc<Notify>>>,
    failing: Mutex<HashSet<String>>,
    list_delay: Mutex<Option<Duration>>,
    list_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockClient {
    pub fn new(devices: Vec<DeviceSnapshot>) -> Self {
        let client = Self::default();
        client.set_devices(devices);
        client
    }

    pub fn set_devices(&self, devices: Vec<DeviceSnapshot>) {
        *self.devices.lock().unwrap() = devices;
    }

    pub fn fail_next_list(&self, error: ClientError) {
        self.list_failures.lock().unwrap().push_back(error);
    }

    pub fn reject_next_apply(&self) {
        self.apply_failures
            .lock()
            .unwrap()
            .push_back(ClientError::Rejected {
                detail: json!({ "code": "4001", "message": "appliance is offline" }),
            });
    }

    /// Applies to `appliance_id` wait until the returned handle is notified
    pub fn hold_applies_for(&self, appliance_id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.held
            .lock()
            .unwrap()
            .insert(appliance_id.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn fail_applies_for(&self, appliance_id: &str) {
        self.failing
            .lock()
            .unwrap()
            .insert(appliance_id.to_string());
    }

    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = Some(delay);
    }

    pub fn applied(&self) -> Vec<DeviceSnapshot> {
        self.applied.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EoliaClient for MockClient {
    async fn list_devices(&self) -> ClientResult<Vec<DeviceSnapshot>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let failure = self.list_failures.lock().unwrap().pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(self.devices.lock().unwrap().clone()),
        }
    }

    async fn apply(&self, device: DeviceSnapshot) -> ClientResult<()> {
        let appliance_id = device.appliance_id.clone();
        self.applied.lock().unwrap().push(device);

        let gate = self.held.lock().unwrap().get(&appliance_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing.lock().unwrap().contains(&appliance_id) {
            return Err(ClientError::Network(format!("{} did not answer", appliance_id)));
        }

        let failure = self.apply_failures.lock().unwrap().pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Register(Vec<Uuid>),
    Unregister(Vec<Uuid>),
    Update(Uuid),
}

#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    fail_register: Mutex<bool>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn fail_registrations(&self) {
        *self.fail_register.lock().unwrap() = true;
    }

    pub fn register_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, HostCall::Register(_)))
            .count()
    }

    pub fn unregister_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, HostCall::Unregister(_)))
            .count()
    }
}

fn uuids(accessories: &[RegisteredAccessory]) -> Vec<Uuid> {
    accessories.iter().map(|a| a.uuid).collect()
}

#[async_trait]
impl AccessoryHost for RecordingHost {
    async fn register_accessories(
        &self,
        accessories: &[RegisteredAccessory],
    ) -> RegistryResult<()> {
        if *self.fail_register.lock().unwrap() {
            return Err(RegistryError::Unavailable("bridge offline".to_string()));
        }
        self.calls
            .lock()
            .unwrap()
            .push(HostCall::Register(uuids(accessories)));
        Ok(())
    }

    async fn unregister_accessories(
        &self,
        accessories: &[RegisteredAccessory],
    ) -> RegistryResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(HostCall::Unregister(uuids(accessories)));
        Ok(())
    }

    async fn update_accessory_metadata(
        &self,
        accessory: &RegisteredAccessory,
    ) -> RegistryResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(HostCall::Update(accessory.uuid));
        Ok(())
    }
}
