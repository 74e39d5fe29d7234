//! Shared test utilities for HTTP integration tests
#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response};
use axum::Router;
use objects_service::http_server::{self, Config};
use objects_service::ServiceState;
use store::{Backend, ObjectStore};
use tempfile::TempDir;
use tower::ServiceExt;

pub fn http_config() -> Config {
    Config::new(SocketAddr::from(([127, 0, 0, 1], 0)))
}

/// Service state over a fresh in-memory store
pub async fn memory_state() -> ServiceState {
    let store = ObjectStore::new("/srv/objects", Backend::Memory)
        .await
        .unwrap();
    ServiceState::new(store)
}

/// Service state over a disk store rooted in a fresh temporary directory
pub async fn disk_state() -> (ServiceState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = ObjectStore::new(temp_dir.path().join("data"), Backend::Disk)
        .await
        .unwrap();
    (ServiceState::new(store), temp_dir)
}

pub fn router(state: ServiceState) -> Router {
    http_server::router(&http_config(), state)
}

/// Send one request through the router
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: impl Into<Body>,
) -> Response<Body> {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Serve the router on an ephemeral local port, returning its address
pub async fn spawn_server(state: ServiceState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
