use std::net::SocketAddr;

use crate::daemon::ServiceConfig;
use crate::state::TlsConfig;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // log level for http tracing
    pub log_level: tracing::Level,
    // upper bound on request bodies, unlimited if not set
    pub max_body_bytes: Option<usize>,
    // serve HTTPS when set
    pub tls: Option<TlsConfig>,
}

impl Config {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            log_level: tracing::Level::INFO,
            max_body_bytes: None,
            tls: None,
        }
    }
}

impl From<&ServiceConfig> for Config {
    fn from(service_config: &ServiceConfig) -> Self {
        tracing::info!(
            "Creating HTTP server Config: listen_addr={}, max_body_bytes={:?}, tls={}",
            service_config.listen_addr,
            service_config.max_body_bytes,
            service_config.tls.is_some()
        );
        Self {
            listen_addr: service_config.listen_addr,
            log_level: tracing::Level::INFO,
            max_body_bytes: service_config.max_body_bytes,
            tls: service_config.tls.clone(),
        }
    }
}
