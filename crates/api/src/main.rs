use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;

use rsvp_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging);

    info!("Starting RSVP service v{}", env!("CARGO_PKG_VERSION"));
    // Hash prefix only; the key itself is never logged.
    let key_hash = shared::crypto::sha256_hex(&config.admin.api_key);
    info!(
        admin_key_fingerprint = &key_hash[..12],
        pin_source = ?config.pins.source,
        "Configuration loaded"
    );

    middleware::init_metrics()?;

    let data_service = app::build_data_service(&config).await?;

    let addr = config.socket_addr()?;
    let app = app::create_app(config, data_service);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
