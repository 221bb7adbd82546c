//! Server startup, TLS loading, and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use filedrop_core::Config;
use filedrop_services::RetentionSweeper;

use crate::state::AppState;

/// Bind the listener, start the retention sweeper, and serve until shutdown.
pub async fn start_server(state: Arc<AppState>, app: Router) -> Result<()> {
    let config = &state.config;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));

    let tls = load_tls(config).await?;

    let listener = std::net::TcpListener::bind(addr)
        .with_context(|| format!("Failed to bind {}", addr))?;
    listener.set_nonblocking(true)?;

    // The sweeper starts only once the listener is bound, and only when
    // retention is enabled.
    let sweeper = match config.retention_window() {
        Some(window) => {
            tracing::info!(
                retention_days = config.retention_days,
                sweep_interval_secs = config.sweep_interval.as_secs(),
                "Retention sweeper started"
            );
            Some(
                Arc::new(RetentionSweeper::new(state.storage.clone(), window))
                    .start(config.sweep_interval),
            )
        }
        None => {
            tracing::info!("Retention disabled; expired-file sweeper not started");
            None
        }
    };

    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    tracing::info!(
        addr = %addr,
        domain = %config.domain,
        upload_url = %format!("{}/upload", config.public_base_url()),
        serving_url = %format!("{}/uploads/<name>", config.public_base_url()),
        "Server ready and accepting connections"
    );

    axum_server::from_tcp_rustls(listener, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }

    Ok(())
}

/// Load TLS material from the configured directory. Key and certificate are
/// required; a chain file is appended to the certificate when present.
async fn load_tls(config: &Config) -> Result<RustlsConfig> {
    let cert_path = config.tls_cert_path();
    let key_path = config.tls_key_path();
    let chain_path = config.tls_chain_path();

    let mut cert = tokio::fs::read(&cert_path)
        .await
        .with_context(|| format!("Failed to read TLS certificate {}", cert_path.display()))?;

    if tokio::fs::try_exists(&chain_path).await.unwrap_or(false) {
        let chain = tokio::fs::read(&chain_path)
            .await
            .with_context(|| format!("Failed to read TLS chain {}", chain_path.display()))?;
        cert.push(b'\n');
        cert.extend(chain);
    }

    let key = tokio::fs::read(&key_path)
        .await
        .with_context(|| format!("Failed to read TLS key {}", key_path.display()))?;

    RustlsConfig::from_pem(cert, key)
        .await
        .with_context(|| format!("Invalid TLS material in {}", config.ssl_dir.display()))
}

/// Signal handler for graceful shutdown.
///
/// # Panics
/// Panics if a signal handler cannot be installed (unrecoverable system error).
async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
