//! `push-relay` — binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP spans).
//! 3. Decode the field encryption key.
//! 4. Build the user-lookup and push-dispatch clients.
//! 5. Build the Axum router and serve until Ctrl-C / SIGTERM.

mod config;
mod crypto;
mod directory;
mod push;
mod relay;
mod server;
mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use config::Config;
use crypto::FieldCodec;
use directory::FirestoreDirectory;
use push::FcmDispatcher;
use relay::{NotificationTitles, Relay};
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        field_mode = ?cfg.field_mode,
        "push-relay starting"
    );

    // -----------------------------------------------------------------------
    // 3. Key
    // -----------------------------------------------------------------------
    let key = Arc::new(cfg.secret_key()?);
    let codec = FieldCodec::new(cfg.field_mode, key);

    // -----------------------------------------------------------------------
    // 4. Collaborators
    // -----------------------------------------------------------------------
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.upstream_timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let directory = FirestoreDirectory::new(
        http.clone(),
        cfg.firestore_base_url.clone(),
        cfg.firebase_project_id.clone(),
        cfg.users_collection.clone(),
        cfg.push_token_field.clone(),
        cfg.google_access_token.clone(),
    );
    let push = FcmDispatcher::new(
        http,
        cfg.fcm_base_url.clone(),
        cfg.firebase_project_id.clone(),
        cfg.google_access_token.clone(),
    );

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let relay = Relay::new(
        codec,
        Arc::new(directory),
        Arc::new(push),
        NotificationTitles::from_config(&cfg),
    );
    let router = server::router::build(AppState::new(relay));

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("push-relay stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
