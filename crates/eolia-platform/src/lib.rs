//! Eolia platform
//!
//! Keeps the host's registered accessories in line with the air conditioners
//! the vendor cloud reports, and exposes each one as a HeaterCooler service.
//!
//! # Key Types
//!
//! - [`EoliaPlatform`] - Owns the registered set and runs discovery passes
//! - [`ReconciliationEngine`] - Computes and applies add/update/remove plans
//! - [`HeaterCooler`] - Per-accessory controller with get/set characteristics
//! - [`CommandApplier`] - Optimistic local update followed by a vendor `apply`
//! - [`NicknameMap`] - Rename table from factory nickname to display alias
//! - [`EoliaClient`] - Vendor cloud collaborator

pub mod client;
pub mod command;
pub mod error;
pub mod heater_cooler;
pub mod nickname;
pub mod platform;
pub mod reconcile;

pub use client::{ClientError, ClientResult, EoliaClient};
pub use command::CommandApplier;
pub use error::{ApplyError, PlatformError, PlatformResult};
pub use heater_cooler::{AccessoryInformation, ControllerSet, HeaterCooler, HeaterCoolerCharacteristics};
pub use nickname::{resolve, NicknameMap};
pub use platform::EoliaPlatform;
pub use reconcile::{reconcile, BindStep, ReconcileSummary, ReconciliationEngine, ReconciliationPlan};
