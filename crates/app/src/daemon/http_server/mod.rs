use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

pub mod api;
mod config;
mod handlers;
mod health;

pub use config::Config;

use crate::daemon::ServiceState;
use crate::state::TlsConfig;

const OBJECTS_PREFIX: &str = "/objects";
const STATUS_PREFIX: &str = "/_status";

/// How long in-flight TLS connections get to finish once shutdown starts
const TLS_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Build the service router: object routes, status routes and the not found fallback.
pub fn router(config: &Config, state: ServiceState) -> Router {
    let log_level = config.log_level;
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let body_limit = match config.max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .nest(STATUS_PREFIX, health::router(state.clone()))
        .nest(OBJECTS_PREFIX, api::router(state.clone()))
        .fallback(handlers::not_found_handler)
        .layer(body_limit)
        .with_state(state)
        .layer(trace_layer)
}

/// Run the HTTP server until the shutdown watch fires.
pub async fn run(
    config: Config,
    state: ServiceState,
    shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let listen_addr = config.listen_addr;
    let router = router(&config, state);

    match config.tls {
        Some(tls) => serve_tls(listen_addr, router, tls, shutdown_rx).await,
        None => serve_plain(listen_addr, router, shutdown_rx).await,
    }
}

async fn serve_plain(
    listen_addr: std::net::SocketAddr,
    router: Router,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    tracing::info!(addr = ?listen_addr, "HTTP server listening");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    tracing::info!("HTTP server shutdown complete");
    Ok(())
}

async fn serve_tls(
    listen_addr: std::net::SocketAddr,
    router: Router,
    tls: TlsConfig,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    use axum_server::tls_rustls::RustlsConfig;

    tracing::info!(cert = ?tls.cert_path, key = ?tls.key_path, "Loading TLS certificate and key");
    let rustls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(HttpServerError::Tls)?;

    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        let _ = shutdown_rx.changed().await;
        shutdown_handle.graceful_shutdown(Some(TLS_SHUTDOWN_GRACE));
    });

    tracing::info!(addr = ?listen_addr, "HTTPS server listening");
    axum_server::bind_rustls(listen_addr, rustls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    tracing::info!("HTTPS server shutdown complete");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
    #[error("failed to load TLS certificate and key: {0}")]
    Tls(#[source] std::io::Error),
}
