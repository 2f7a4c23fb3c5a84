//! Pricepulse server - pricing and sentiment inference API
//!
//! Serves the trained pricing model and the VADER sentiment scorer over
//! HTTP. The model artifact is loaded once at startup; train one first
//! with the `train` binary.
//!
//! # Usage
//! ```sh
//! PORT=5000 MODEL_PATH=data/models/pricing.json cargo run --bin pricepulse
//! ```
//!
//! # Environment Variables
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Bind port (default: 5000)
//! - `MODEL_PATH` - Pricing model artifact (default: data/models/pricing.json)

use anyhow::Result;
use pricepulse::application::pricing::PricingModel;
use pricepulse::config::Config;
use pricepulse::interfaces::http::{build_app, AppState};
use tracing::{info, warn, Level};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Pricepulse {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let mut pricing = PricingModel::new();
    if config.model_path.exists() {
        pricing.load(&config.model_path)?;
    } else {
        warn!(
            path = %config.model_path.display(),
            "Model artifact not found. Price predictions will fail until one is trained."
        );
    }

    let app = build_app(AppState::new(pricing));

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received.");
}
