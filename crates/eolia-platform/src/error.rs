//! Platform error types

use eolia_registries::RegistryError;
use thiserror::Error;

use crate::client::ClientError;

/// A command submission failed
///
/// The optimistic local change is not rolled back; the next discovery pass
/// brings the device's real state back.
#[derive(Debug, Error)]
#[error("failed to apply state to {appliance_id}: {source}")]
pub struct ApplyError {
    pub appliance_id: String,
    #[source]
    pub source: ClientError,
}

/// Errors surfaced by a discovery pass
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Inventory fetch failed; nothing was changed
    #[error("device discovery failed: {0}")]
    Discovery(#[source] ClientError),

    /// The host registry refused a call; passes already applied stay applied
    #[error("accessory registry error: {0}")]
    Registry(#[from] RegistryError),
}

pub type PlatformResult<T> = Result<T, PlatformError>;
