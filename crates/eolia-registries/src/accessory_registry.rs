//! Accessory Registry
//!
//! Persists every accessory the platform has registered, keyed by UUID, so
//! the platform can restore them before the first discovery pass.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use eolia_core::RegisteredAccessory;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::storage::{Storable, Storage, StorageError};

/// Storage key for the accessory registry
pub const STORAGE_KEY: &str = "eolia.accessories";
/// Current storage version
pub const STORAGE_VERSION: u32 = 1;
/// Current minor version
pub const STORAGE_MINOR_VERSION: u32 = 1;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("accessory {0} is already registered")]
    DuplicateUuid(Uuid),

    #[error("accessory {0} is not registered")]
    NotRegistered(Uuid),

    #[error("host registry unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// A persisted accessory with bookkeeping timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessoryEntry {
    #[serde(flatten)]
    pub accessory: RegisteredAccessory,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub modified_at: DateTime<Utc>,

    /// Insertion order (for stable iteration when timestamps are equal)
    #[serde(skip)]
    pub insertion_order: u64,
}

impl AccessoryEntry {
    pub fn new(accessory: RegisteredAccessory) -> Self {
        let now = Utc::now();
        Self {
            accessory,
            created_at: now,
            modified_at: now,
            insertion_order: 0,
        }
    }
}

/// Accessory registry data for storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessoryRegistryData {
    pub accessories: Vec<AccessoryEntry>,
}

impl Storable for AccessoryRegistryData {
    const KEY: &'static str = STORAGE_KEY;
    const VERSION: u32 = STORAGE_VERSION;
    const MINOR_VERSION: u32 = STORAGE_MINOR_VERSION;
}

/// Persistent accessory registry
///
/// Every mutation is written through to storage before it returns.
/// Entries are stored as `Arc<AccessoryEntry>` to avoid cloning on reads.
pub struct AccessoryRegistry {
    storage: Arc<Storage>,

    /// Primary index: uuid -> entry
    by_uuid: DashMap<Uuid, Arc<AccessoryEntry>>,

    /// Serializes mutate-then-save sequences
    write_lock: Mutex<()>,

    /// Counter for insertion ordering
    insertion_counter: AtomicU64,
}

impl AccessoryRegistry {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            storage,
            by_uuid: DashMap::new(),
            write_lock: Mutex::new(()),
            insertion_counter: AtomicU64::new(0),
        }
    }

    /// Load from storage
    pub async fn load(&self) -> RegistryResult<()> {
        if let Some(storage_file) = self.storage.read::<AccessoryRegistryData>().await? {
            info!(
                "Loading {} accessories from storage (v{}.{})",
                storage_file.data.accessories.len(),
                storage_file.version,
                storage_file.minor_version
            );

            let mut accessories = storage_file.data.accessories;
            accessories.sort_by_key(|e| e.created_at);
            for entry in accessories {
                self.insert_entry(entry);
            }
        }
        Ok(())
    }

    /// Save to storage
    pub async fn save(&self) -> RegistryResult<()> {
        let data = AccessoryRegistryData {
            accessories: self.entries().iter().map(|e| (**e).clone()).collect(),
        };
        self.storage.write(&data).await?;
        debug!("Saved {} accessories to storage", self.by_uuid.len());
        Ok(())
    }

    fn insert_entry(&self, mut entry: AccessoryEntry) {
        entry.insertion_order = self.insertion_counter.fetch_add(1, Ordering::Relaxed);
        self.by_uuid.insert(entry.accessory.uuid, Arc::new(entry));
    }

    /// Register new accessories
    ///
    /// Fails without changing anything if any UUID is already registered or
    /// repeated within the batch.
    pub async fn register(&self, accessories: &[RegisteredAccessory]) -> RegistryResult<()> {
        let _guard = self.write_lock.lock().await;

        for (i, accessory) in accessories.iter().enumerate() {
            let repeated = accessories[..i].iter().any(|a| a.uuid == accessory.uuid);
            if repeated || self.by_uuid.contains_key(&accessory.uuid) {
                return Err(RegistryError::DuplicateUuid(accessory.uuid));
            }
        }

        for accessory in accessories {
            debug!(uuid = %accessory.uuid, name = %accessory.display_name, "Registering accessory");
            self.insert_entry(AccessoryEntry::new(accessory.clone()));
        }

        self.save().await
    }

    /// Unregister accessories; unknown UUIDs are skipped
    pub async fn unregister(&self, accessories: &[RegisteredAccessory]) -> RegistryResult<()> {
        let _guard = self.write_lock.lock().await;

        for accessory in accessories {
            if self.by_uuid.remove(&accessory.uuid).is_none() {
                warn!(uuid = %accessory.uuid, "Cannot unregister unknown accessory");
            } else {
                debug!(uuid = %accessory.uuid, name = %accessory.display_name, "Unregistered accessory");
            }
        }

        self.save().await
    }

    /// Replace the stored record for a registered accessory
    ///
    /// `modified_at` only moves when the record actually changed.
    pub async fn update(&self, accessory: &RegisteredAccessory) -> RegistryResult<()> {
        let _guard = self.write_lock.lock().await;

        let existing = self
            .get(&accessory.uuid)
            .ok_or(RegistryError::NotRegistered(accessory.uuid))?;

        if existing.accessory == *accessory {
            return Ok(());
        }

        let mut entry = (*existing).clone();
        entry.accessory = accessory.clone();
        entry.modified_at = Utc::now();
        self.by_uuid.insert(accessory.uuid, Arc::new(entry));

        self.save().await
    }

    pub fn get(&self, uuid: &Uuid) -> Option<Arc<AccessoryEntry>> {
        self.by_uuid.get(uuid).map(|r| Arc::clone(r.value()))
    }

    pub fn contains(&self, uuid: &Uuid) -> bool {
        self.by_uuid.contains_key(uuid)
    }

    /// All entries in insertion order
    pub fn entries(&self) -> Vec<Arc<AccessoryEntry>> {
        let mut entries: Vec<_> = self.by_uuid.iter().map(|r| Arc::clone(r.value())).collect();
        entries.sort_by_key(|e| e.insertion_order);
        entries
    }

    /// Accessories to hand to the platform at startup, in insertion order
    pub fn cached_accessories(&self) -> Vec<RegisteredAccessory> {
        self.entries()
            .into_iter()
            .map(|e| e.accessory.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_uuid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uuid.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eolia_core::{accessory_uuid, DeviceSnapshot, OperationMode};
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    fn accessory(appliance_id: &str, name: &str) -> RegisteredAccessory {
        let mut accessory = RegisteredAccessory::new(accessory_uuid(appliance_id), name);
        accessory.bound_device = Some(
            DeviceSnapshot::new(appliance_id, name)
                .with_operation(true, OperationMode::Cooling)
                .with_temperatures(27.0, 25.0),
        );
        accessory.nickname = Some(name.to_string());
        accessory
    }

    fn registry(dir: &TempDir) -> AccessoryRegistry {
        AccessoryRegistry::new(Arc::new(Storage::new(dir.path())))
    }

    #[tokio::test]
    async fn test_register_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let first = registry(&temp_dir);

        first
            .register(&[accessory("A1", "Living Room"), accessory("A2", "Bedroom")])
            .await
            .unwrap();
        assert_eq!(first.len(), 2);

        let second = registry(&temp_dir);
        second.load().await.unwrap();

        let cached = second.cached_accessories();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].display_name, "Living Room");
        assert_eq!(cached[1].display_name, "Bedroom");
        assert_eq!(cached[0].appliance_id(), Some("A1"));
    }

    #[tokio::test]
    async fn test_duplicate_uuid_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(&temp_dir);

        registry.register(&[accessory("A1", "Living Room")]).await.unwrap();
        let result = registry.register(&[accessory("A1", "Again")]).await;

        assert!(matches!(result, Err(RegistryError::DuplicateUuid(u)) if u == accessory_uuid("A1")));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_within_batch_registers_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(&temp_dir);

        let result = registry
            .register(&[accessory("A1", "One"), accessory("A1", "Two")])
            .await;
        assert!(matches!(result, Err(RegistryError::DuplicateUuid(_))));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_unregister_skips_unknown() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(&temp_dir);

        assert_ok!(registry.register(&[accessory("A1", "Living Room")]).await);
        assert_ok!(
            registry
                .unregister(&[accessory("A1", "Living Room"), accessory("ZZ", "Ghost")])
                .await
        );
        assert!(registry.is_empty());

        let reloaded = AccessoryRegistry::new(Arc::new(Storage::new(temp_dir.path())));
        reloaded.load().await.unwrap();
        assert!(reloaded.is_empty());
    }

    #[tokio::test]
    async fn test_update() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(&temp_dir);

        let mut acc = accessory("A1", "Living Room");
        registry.register(&[acc.clone()]).await.unwrap();
        let created = registry.get(&acc.uuid).unwrap();

        registry.update(&acc).await.unwrap();
        assert_eq!(registry.get(&acc.uuid).unwrap().modified_at, created.modified_at);

        acc.bound_device = None;
        registry.update(&acc).await.unwrap();
        let updated = registry.get(&acc.uuid).unwrap();
        assert!(updated.accessory.bound_device.is_none());
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.modified_at >= created.modified_at);
    }

    #[tokio::test]
    async fn test_update_unknown() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(&temp_dir);

        let result = registry.update(&accessory("A1", "Living Room")).await;
        assert!(matches!(result, Err(RegistryError::NotRegistered(_))));
    }

    #[tokio::test]
    async fn test_storage_layout() {
        let temp_dir = TempDir::new().unwrap();
        let registry = registry(&temp_dir);
        registry.register(&[accessory("A1", "Living Room")]).await.unwrap();

        let raw = std::fs::read_to_string(temp_dir.path().join(".storage").join(STORAGE_KEY))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["version"], STORAGE_VERSION);
        assert_eq!(json["key"], STORAGE_KEY);
        let first = &json["data"]["accessories"][0];
        assert_eq!(first["display_name"], "Living Room");
        assert_eq!(first["bound_device"]["applianceId"], "A1");
    }
}
