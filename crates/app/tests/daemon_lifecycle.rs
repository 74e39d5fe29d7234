use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use objects_service::daemon::process::start_service;
use objects_service::ServiceConfig;
use store::Backend;

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::test]
async fn test_start_serve_and_shutdown() {
    let listen_addr = SocketAddr::from(([127, 0, 0, 1], free_port()));
    let config = ServiceConfig {
        root_dir: "/srv/objects".into(),
        backend: Backend::Memory,
        listen_addr,
        max_body_bytes: None,
        tls: None,
        log_level: tracing::Level::INFO,
        log_dir: None,
    };

    let (state, handle) = start_service(&config).await;
    assert!(state.store().is_available().await.unwrap());

    let client = reqwest::Client::new();
    let livez = format!("http://{}/_status/livez", listen_addr);
    let mut up = false;
    for _ in 0..50 {
        if let Ok(response) = client.get(&livez).send().await {
            assert!(response.status().is_success());
            up = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(up, "server never came up on {}", listen_addr);

    let response = client
        .put(format!("http://{}/objects/bucket/object", listen_addr))
        .body("payload")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    handle.shutdown();
    tokio::time::timeout(Duration::from_secs(10), handle.wait())
        .await
        .unwrap();

    assert!(reqwest::Client::new().get(&livez).send().await.is_err());
}
