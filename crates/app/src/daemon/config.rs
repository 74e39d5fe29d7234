use std::net::SocketAddr;
use std::path::PathBuf;

use store::Backend;

use crate::state::{AppConfig, TlsConfig};

#[derive(Debug, Clone)]
pub struct Config {
    // store configuration
    /// directory all buckets live under
    pub root_dir: PathBuf,
    /// which filesystem backs the store
    pub backend: Backend,

    // http server configuration
    /// address for the HTTP server to listen on
    pub listen_addr: SocketAddr,
    /// upper bound on request bodies, unlimited if not set
    pub max_body_bytes: Option<usize>,
    /// serve HTTPS with these credentials, plain HTTP if not set
    pub tls: Option<TlsConfig>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Build a service config on top of the values persisted in `config.toml`
    pub fn from_app_config(app_config: &AppConfig) -> Self {
        Self {
            root_dir: app_config.root_dir.clone(),
            backend: app_config.backend(),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], app_config.port)),
            max_body_bytes: app_config.max_body_bytes.filter(|limit| *limit > 0),
            tls: app_config.tls.clone(),
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }

    /// Combine separately supplied certificate and key paths.
    ///
    /// Either both or neither must be given.
    pub fn tls_from_paths(
        cert_path: Option<PathBuf>,
        key_path: Option<PathBuf>,
    ) -> Result<Option<TlsConfig>, ConfigError> {
        match (cert_path, key_path) {
            (Some(cert_path), Some(key_path)) => Ok(Some(TlsConfig {
                cert_path,
                key_path,
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingTlsKey),
            (None, Some(_)) => Err(ConfigError::MissingTlsCert),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("a TLS certificate was given without a private key")]
    MissingTlsKey,
    #[error("a TLS private key was given without a certificate")]
    MissingTlsCert,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_app_config() {
        let app_config = AppConfig {
            port: 9000,
            memory: true,
            max_body_bytes: Some(0),
            ..AppConfig::default()
        };

        let config = Config::from_app_config(&app_config);
        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.root_dir, PathBuf::from("./data"));
        // zero means unlimited
        assert!(config.max_body_bytes.is_none());
        assert!(config.tls.is_none());
    }

    #[test]
    fn test_tls_from_paths() {
        assert!(Config::tls_from_paths(None, None).unwrap().is_none());

        let tls = Config::tls_from_paths(Some("cert.pem".into()), Some("key.pem".into()))
            .unwrap()
            .unwrap();
        assert_eq!(tls.cert_path, PathBuf::from("cert.pem"));
        assert_eq!(tls.key_path, PathBuf::from("key.pem"));

        assert!(matches!(
            Config::tls_from_paths(Some("cert.pem".into()), None),
            Err(ConfigError::MissingTlsKey)
        ));
        assert!(matches!(
            Config::tls_from_paths(None, Some("key.pem".into())),
            Err(ConfigError::MissingTlsCert)
        ));
    }
}
