//! Host registry contract
//!
//! The platform never talks to the home-automation host directly; it goes
//! through this trait so the host side can be the persistent
//! [`AccessoryRegistry`](crate::AccessoryRegistry) or a test double.

use async_trait::async_trait;
use eolia_core::{accessory_uuid, RegisteredAccessory};
use uuid::Uuid;

use crate::accessory_registry::{AccessoryRegistry, RegistryResult};

#[async_trait]
pub trait AccessoryHost: Send + Sync {
    /// Deterministic UUID for a seed (the appliance id)
    fn generate_uuid(&self, seed: &str) -> Uuid {
        accessory_uuid(seed)
    }

    /// Register newly discovered accessories
    async fn register_accessories(&self, accessories: &[RegisteredAccessory])
        -> RegistryResult<()>;

    /// Unregister accessories whose devices are gone
    async fn unregister_accessories(
        &self,
        accessories: &[RegisteredAccessory],
    ) -> RegistryResult<()>;

    /// Persist the current metadata (bound snapshot, names) of a registered accessory
    async fn update_accessory_metadata(&self, accessory: &RegisteredAccessory)
        -> RegistryResult<()>;
}

#[async_trait]
impl AccessoryHost for AccessoryRegistry {
    async fn register_accessories(
        &self,
        accessories: &[RegisteredAccessory],
    ) -> RegistryResult<()> {
        self.register(accessories).await
    }

    async fn unregister_accessories(
        &self,
        accessories: &[RegisteredAccessory],
    ) -> RegistryResult<()> {
        self.unregister(accessories).await
    }

    async fn update_accessory_metadata(
        &self,
        accessory: &RegisteredAccessory,
    ) -> RegistryResult<()> {
        self.update(accessory).await
    }
}
