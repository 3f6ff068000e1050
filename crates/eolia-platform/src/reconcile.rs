//! Accessory/device reconciliation
//!
//! A pass runs in four steps, in this order:
//!
//! 1. unbind accessories whose device is missing from the inventory
//! 2. for each fetched device in order, rebind the accessory with the
//!    matching UUID or create and register a new one
//! 3. give every touched accessory a fresh controller
//! 4. remove and unregister accessories still unbound
//!
//! [`reconcile`] computes the plan without side effects;
//! [`ReconciliationEngine::apply`] executes it against the host. A host
//! failure aborts the pass where it happened; completed steps are not
//! rolled back.

use std::collections::HashSet;

use eolia_core::{ClimateState, DeviceSnapshot, RegisteredAccessory};
use eolia_registries::AccessoryHost;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::PlatformResult;
use crate::heater_cooler::ControllerSet;
use crate::nickname::NicknameMap;

/// Step 2 action for one fetched device
#[derive(Debug, Clone, PartialEq)]
pub enum BindStep {
    /// An accessory with this UUID exists (or was created earlier in the pass)
    Rebind { uuid: Uuid, device: DeviceSnapshot },
    /// First sighting of this appliance
    Create {
        uuid: Uuid,
        display_name: String,
        device: DeviceSnapshot,
    },
}

impl BindStep {
    pub fn uuid(&self) -> Uuid {
        match self {
            BindStep::Rebind { uuid, .. } | BindStep::Create { uuid, .. } => *uuid,
        }
    }
}

/// The add/update/remove plan for one pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationPlan {
    pub unbind: Vec<Uuid>,
    pub bind: Vec<BindStep>,
    pub remove: Vec<Uuid>,
}

impl ReconciliationPlan {
    pub fn creates(&self) -> usize {
        self.bind
            .iter()
            .filter(|s| matches!(s, BindStep::Create { .. }))
            .count()
    }

    pub fn rebinds(&self) -> usize {
        self.bind.len() - self.creates()
    }
}

/// Counts from an applied pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub unbound: usize,
    pub restored: usize,
    pub added: usize,
    pub removed: usize,
}

/// Compute the plan for aligning `registered` with `fetched`
///
/// If `fetched` repeats an appliance id, the first occurrence creates (or
/// rebinds) and later ones rebind, so the last snapshot wins.
pub fn reconcile<F>(
    registered: &[RegisteredAccessory],
    fetched: &[DeviceSnapshot],
    nicknames: &NicknameMap,
    uuid_for: F,
) -> ReconciliationPlan
where
    F: Fn(&str) -> Uuid,
{
    let fetched_ids: HashSet<&str> = fetched.iter().map(|d| d.appliance_id.as_str()).collect();

    let unbind: Vec<Uuid> = registered
        .iter()
        .filter(|a| a.appliance_id().is_some_and(|id| !fetched_ids.contains(id)))
        .map(|a| a.uuid)
        .collect();

    let mut known: HashSet<Uuid> = registered.iter().map(|a| a.uuid).collect();
    let mut rebound: HashSet<Uuid> = HashSet::new();
    let mut bind = Vec::with_capacity(fetched.len());

    for device in fetched {
        let uuid = uuid_for(&device.appliance_id);
        if known.contains(&uuid) {
            rebound.insert(uuid);
            bind.push(BindStep::Rebind {
                uuid,
                device: device.clone(),
            });
        } else {
            known.insert(uuid);
            bind.push(BindStep::Create {
                uuid,
                display_name: nicknames.resolve(&device.nickname).to_string(),
                device: device.clone(),
            });
        }
    }

    let remove = registered
        .iter()
        .filter(|a| {
            let still_bound = a.is_bound() && !unbind.contains(&a.uuid);
            !still_bound && !rebound.contains(&a.uuid)
        })
        .map(|a| a.uuid)
        .collect();

    ReconciliationPlan {
        unbind,
        bind,
        remove,
    }
}

/// Runs reconciliation passes against a host registry
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    nicknames: NicknameMap,
}

impl ReconciliationEngine {
    pub fn new(nicknames: NicknameMap) -> Self {
        Self { nicknames }
    }

    pub fn plan(
        &self,
        registered: &[RegisteredAccessory],
        fetched: &[DeviceSnapshot],
        host: &dyn AccessoryHost,
    ) -> ReconciliationPlan {
        reconcile(registered, fetched, &self.nicknames, |id| {
            host.generate_uuid(id)
        })
    }

    /// Plan and apply one pass
    #[instrument(skip_all, fields(registered = registered.len(), fetched = fetched.len()))]
    pub async fn run(
        &self,
        registered: &mut Vec<RegisteredAccessory>,
        fetched: &[DeviceSnapshot],
        controllers: &mut ControllerSet,
        host: &dyn AccessoryHost,
    ) -> PlatformResult<ReconcileSummary> {
        let plan = self.plan(registered, fetched, host);
        debug!(
            unbind = plan.unbind.len(),
            rebind = plan.rebinds(),
            create = plan.creates(),
            remove = plan.remove.len(),
            "Computed reconciliation plan"
        );
        self.apply(plan, registered, controllers, host).await
    }

    /// Execute a plan in order: unbind, bind/create, remove
    pub async fn apply(
        &self,
        plan: ReconciliationPlan,
        registered: &mut Vec<RegisteredAccessory>,
        controllers: &mut ControllerSet,
        host: &dyn AccessoryHost,
    ) -> PlatformResult<ReconcileSummary> {
        let mut summary = ReconcileSummary::default();

        for uuid in &plan.unbind {
            if let Some(accessory) = registered.iter_mut().find(|a| a.uuid == *uuid) {
                debug!(uuid = %uuid, "Device for {} is gone", accessory.display_name);
                accessory.bound_device = None;
                summary.unbound += 1;
            }
        }

        for step in plan.bind {
            match step {
                BindStep::Rebind { uuid, device } => {
                    let Some(accessory) = registered.iter_mut().find(|a| a.uuid == uuid) else {
                        warn!(uuid = %uuid, "Planned rebind for an accessory that is not registered");
                        continue;
                    };
                    info!(
                        "Restoring existing accessory from cache: {}",
                        accessory.display_name
                    );

                    accessory.bound_device = Some(device);
                    host.update_accessory_metadata(accessory).await?;
                    controllers.bind(accessory);
                    summary.restored += 1;
                }
                BindStep::Create {
                    uuid,
                    display_name,
                    device,
                } => {
                    info!(
                        "Adding new air conditioner \"{}\" model \"{}\"",
                        device.nickname, device.product_code
                    );
                    if display_name != device.nickname {
                        info!(
                            "Renaming new air conditioner \"{}\" to \"{}\"",
                            device.nickname, display_name
                        );
                    }

                    let climate = ClimateState::from_snapshot(&device);
                    debug!(uuid = %uuid, ?climate, "Initial climate state");

                    let mut accessory = RegisteredAccessory::new(uuid, display_name.clone());
                    accessory.nickname = Some(display_name);
                    accessory.bound_device = Some(device);

                    host.register_accessories(std::slice::from_ref(&accessory))
                        .await?;
                    controllers.bind(&accessory);
                    registered.push(accessory);
                    summary.added += 1;
                }
            }
        }

        if !plan.remove.is_empty() {
            let (stale, kept): (Vec<_>, Vec<_>) = std::mem::take(registered)
                .into_iter()
                .partition(|a| plan.remove.contains(&a.uuid));
            *registered = kept;

            for accessory in &stale {
                info!("Removing air conditioner \"{}\"", accessory.display_name);
                controllers.remove(&accessory.uuid);
            }

            summary.removed = stale.len();
            host.unregister_accessories(&stale).await?;
        }

        Ok(summary)
    }
}
