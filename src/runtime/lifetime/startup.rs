use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{GeolocationProvider, IpstackProvider, LocationService};
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub location_service: Arc<LocationService>,
}

/// 安装 rustls 加密后端（重复安装视为成功）
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}

/// 连接存储并构建服务
pub async fn prepare_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    install_crypto_provider();

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.backend_info().storage_type
    );

    let provider: Arc<dyn GeolocationProvider> = Arc::new(IpstackProvider::new(&config.provider));
    info!(
        "Geolocation provider: {} ({})",
        provider.name(),
        config.provider.base_url
    );

    let location_service = Arc::new(LocationService::new(storage.clone(), provider));

    debug!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(StartupContext {
        storage,
        location_service,
    })
}
