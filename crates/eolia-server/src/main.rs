//! Eolia bridge
//!
//! Loads the platform configuration, restores registered accessories from
//! `.storage`, and keeps them in line with the air conditioner inventory.

mod fixture_client;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use eolia_config::{PlatformConfig, DEFAULT_CONFIG_FILE};
use eolia_platform::EoliaPlatform;
use eolia_registries::{AccessoryRegistry, Storage};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::fixture_client::FixtureClient;

const CONFIG_DIR_ENV: &str = "EOLIA_CONFIG_DIR";

/// Config directory from the first argument, then `EOLIA_CONFIG_DIR`, then cwd
fn config_dir() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_DIR_ENV).ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

async fn discover(platform: &EoliaPlatform) {
    if let Err(e) = platform.discover_devices().await {
        warn!("Discovery pass failed: {}", e);
    }
}

/// Ticks every `secs`; a pass that overruns pushes the next tick back
fn discovery_interval(secs: u64) -> Interval {
    let mut interval = tokio::time::interval(Duration::from_secs(secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_dir = config_dir();
    info!("Starting Eolia bridge, config directory {}", config_dir.display());

    let config = PlatformConfig::load(&config_dir, DEFAULT_CONFIG_FILE)
        .with_context(|| format!("loading {}", config_dir.join(DEFAULT_CONFIG_FILE).display()))?;

    let devices_path = config
        .devices_path(&config_dir)
        .context("devices_file must be set to run without the cloud client")?;
    let client = Arc::new(FixtureClient::new(devices_path));
    info!("Reading inventory from {}", client.path().display());

    let registry = Arc::new(AccessoryRegistry::new(Arc::new(Storage::new(&config_dir))));
    registry.load().await.context("loading accessory registry")?;

    let platform = EoliaPlatform::new(&config, client, Arc::clone(&registry) as _);
    platform.restore_cached(registry.cached_accessories()).await;

    discover(&platform).await;

    if config.discovery_interval_secs == 0 {
        info!("{} is running", platform.name());
        tokio::signal::ctrl_c().await?;
    } else {
        let mut interval = discovery_interval(config.discovery_interval_secs);
        // The first tick completes immediately and startup discovery already ran.
        interval.tick().await;
        info!(
            "{} is running, discovery every {}s",
            platform.name(),
            config.discovery_interval_secs
        );

        loop {
            tokio::select! {
                _ = interval.tick() => discover(&platform).await,
                result = tokio::signal::ctrl_c() => {
                    result?;
                    break;
                }
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}
