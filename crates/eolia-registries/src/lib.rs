//! Accessory registry for the Eolia bridge
//!
//! This crate provides:
//! - [`AccessoryHost`], the contract the platform uses to register,
//!   unregister and update accessories with the home-automation host
//! - [`AccessoryRegistry`], a host implementation that persists accessories
//!   as versioned JSON in the `.storage/` directory so they survive restarts

pub mod accessory_registry;
pub mod host;
pub mod storage;

pub use accessory_registry::{
    AccessoryEntry, AccessoryRegistry, AccessoryRegistryData, RegistryError, RegistryResult,
    STORAGE_KEY, STORAGE_MINOR_VERSION, STORAGE_VERSION,
};
pub use host::AccessoryHost;
pub use storage::{Storable, Storage, StorageError, StorageFile, StorageResult};
