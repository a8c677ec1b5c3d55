//! Ferrypay Service - payment gateway for the ferry-booking site
//!
//! This is the main entry point for the ferrypay service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ferrypay_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ferrypay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ferrypay Service");

    let config = ServiceConfig::from_env()?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        mpay_base_url = %config.mpay_base_url,
        merchant_id = %config.merchant_id,
        "Service configuration loaded"
    );

    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(config)?;

    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
