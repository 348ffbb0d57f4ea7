//! Server mode
//!
//! 组装存储、服务与路由并启动 HTTP 服务器。

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::api::services::{AppStartTime, TrustedProxies, health_routes, locations_routes};
use crate::config::get_config;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// 日志系统必须在调用前初始化。
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let config = get_config();
    let startup = lifetime::startup::prepare_startup(&config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let storage = startup.storage.clone();
    let location_service = startup.location_service.clone();
    let trusted_proxies = TrustedProxies(config.server.trusted_proxies.clone());
    let route_prefix = config.server.route_prefix.trim_end_matches('/').to_string();

    if trusted_proxies.0.is_empty() {
        warn!(
            "Client IP: auto-detect mode. Connections from private IPs will use X-Forwarded-For. \
             Configure server.trusted_proxies to restrict."
        );
    } else {
        info!("Client IP: trusted proxies {:?}", trusted_proxies.0);
    }

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let db_for_shutdown = storage.get_db().clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(location_service.clone()))
            .app_data(web::Data::new(trusted_proxies.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .service(health_routes())
            .service(web::scope(&route_prefix).service(locations_routes()))
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();
    let server_handle = server.handle();

    tokio::select! {
        res = server => {
            res.context("HTTP server error")?;
        }
        _ = lifetime::shutdown::wait_for_signal() => {
            server_handle.stop(true).await;
        }
    }

    lifetime::shutdown::close_database(db_for_shutdown).await;
    warn!("Server stopped");
    Ok(())
}
