//! Maintenance Request Report Server
//!
//! Renders maintenance requests into downloadable PDF reports.

use std::net::SocketAddr;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use request_pdf_server::{app, config::Config, state::AppState};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "request_pdf_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Starting report server v{}", env!("CARGO_PKG_VERSION"));

    // Font capability is resolved once here and never re-checked
    let state = AppState::new(config.clone());
    if state.reports().fonts().is_available() {
        tracing::info!("Arabic font: enabled ({})", config.reports.font_path);
    } else {
        tracing::info!("Arabic font: disabled, using default font");
    }

    let app = app(state);

    let host: std::net::IpAddr = config.server.host.parse().unwrap_or_else(|e| {
        tracing::warn!("Invalid SERVER_HOST {:?}: {}, binding 0.0.0.0", config.server.host, e);
        [0, 0, 0, 0].into()
    });
    let addr = SocketAddr::new(host, config.server.port);
    tracing::info!("Report server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
