//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::{AccessLog, IdentityMiddleware};
use crate::api::services::configure_routes;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = crate::config::get_config();

    let startup = lifetime::startup::prepare_server_startup(&config)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let state = web::Data::new(startup.state);
    let identity = startup.identity;

    let workers = config.server.workers.clamp(1, 32);
    warn!("Using {} worker(s) for the server", workers);

    let bind_address = config.server.listen_addr();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::new(identity.clone()))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .wrap(AccessLog) // 最外层，记录请求 ID 与耗时
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);
    server.run().await.context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}
