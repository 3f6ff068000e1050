//! Eolia platform
//!
//! Owns the registered accessory set and the live controllers, and runs
//! discovery passes against the vendor client and the host registry.

use std::sync::Arc;

use eolia_config::PlatformConfig;
use eolia_core::RegisteredAccessory;
use eolia_registries::AccessoryHost;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::client::EoliaClient;
use crate::command::CommandApplier;
use crate::error::{PlatformError, PlatformResult};
use crate::heater_cooler::{ControllerSet, HeaterCooler};
use crate::nickname::NicknameMap;
use crate::reconcile::{ReconcileSummary, ReconciliationEngine};

struct PlatformState {
    accessories: Vec<RegisteredAccessory>,
    controllers: ControllerSet,
}

pub struct EoliaPlatform {
    name: String,
    client: Arc<dyn EoliaClient>,
    host: Arc<dyn AccessoryHost>,
    engine: ReconciliationEngine,
    /// Also the single-flight guard: a discovery pass holds it from fetch to
    /// the last registry call, so overlapping triggers run one after another.
    state: Mutex<PlatformState>,
}

impl EoliaPlatform {
    pub fn new(
        config: &PlatformConfig,
        client: Arc<dyn EoliaClient>,
        host: Arc<dyn AccessoryHost>,
    ) -> Self {
        let nicknames = NicknameMap::build(config.nickname_entries());
        Self::with_nicknames(config.name.clone(), nicknames, client, host)
    }

    pub fn with_nicknames(
        name: impl Into<String>,
        nicknames: NicknameMap,
        client: Arc<dyn EoliaClient>,
        host: Arc<dyn AccessoryHost>,
    ) -> Self {
        let name = name.into();
        debug!("Finished initializing platform: {}", name);

        let controllers = ControllerSet::new(CommandApplier::new(Arc::clone(&client)));
        Self {
            name,
            client,
            host,
            engine: ReconciliationEngine::new(nicknames),
            state: Mutex::new(PlatformState {
                accessories: Vec::new(),
                controllers,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Take over an accessory the host restored from its cache
    ///
    /// The restored binding is dropped; the next discovery pass rebinds it
    /// or removes it.
    pub async fn configure_accessory(&self, mut accessory: RegisteredAccessory) {
        info!("Loading accessory from cache: {}", accessory.display_name);

        let mut state = self.state.lock().await;
        if state.accessories.iter().any(|a| a.uuid == accessory.uuid) {
            warn!(uuid = %accessory.uuid, "Ignoring duplicate cached accessory");
            return;
        }

        accessory.bound_device = None;
        state.accessories.push(accessory);
    }

    pub async fn restore_cached(&self, accessories: impl IntoIterator<Item = RegisteredAccessory>) {
        for accessory in accessories {
            self.configure_accessory(accessory).await;
        }
    }

    /// Fetch the inventory and reconcile the registered set with it
    ///
    /// A fetch failure leaves everything untouched.
    #[instrument(skip(self), fields(platform = %self.name))]
    pub async fn discover_devices(&self) -> PlatformResult<ReconcileSummary> {
        let mut state = self.state.lock().await;

        let devices = self
            .client
            .list_devices()
            .await
            .map_err(PlatformError::Discovery)?;
        debug!("Found {} Eolia devices", devices.len());

        let PlatformState {
            accessories,
            controllers,
        } = &mut *state;
        let summary = self
            .engine
            .run(accessories, &devices, controllers, self.host.as_ref())
            .await?;

        info!(
            added = summary.added,
            restored = summary.restored,
            removed = summary.removed,
            "Discovery pass complete"
        );
        Ok(summary)
    }

    /// Current registered set
    pub async fn accessories(&self) -> Vec<RegisteredAccessory> {
        self.state.lock().await.accessories.clone()
    }

    pub async fn controller(&self, uuid: &Uuid) -> Option<Arc<HeaterCooler>> {
        self.state.lock().await.controllers.get(uuid)
    }

    pub async fn controller_for_appliance(&self, appliance_id: &str) -> Option<Arc<HeaterCooler>> {
        let uuid = self.host.generate_uuid(appliance_id);
        self.controller(&uuid).await
    }

    pub async fn controller_count(&self) -> usize {
        self.state.lock().await.controllers.len()
    }
}
