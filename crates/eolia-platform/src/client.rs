//! Vendor cloud client contract
//!
//! The network protocol lives outside this crate; the platform only needs
//! inventory listing and state submission.

use async_trait::async_trait;
use eolia_core::DeviceSnapshot;
use thiserror::Error;

/// Errors reported by a vendor client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),

    /// The service answered with an error body
    #[error("request rejected: {detail}")]
    Rejected { detail: serde_json::Value },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Failure detail as JSON, for logging
    pub fn detail(&self) -> serde_json::Value {
        match self {
            ClientError::Rejected { detail } => detail.clone(),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[async_trait]
pub trait EoliaClient: Send + Sync {
    /// Fetch every air conditioner on the account
    async fn list_devices(&self) -> ClientResult<Vec<DeviceSnapshot>>;

    /// Submit the full desired state of one device
    async fn apply(&self, device: DeviceSnapshot) -> ClientResult<()>;
}
