use std::path::PathBuf;

use clap::Args;

use objects_service::daemon::{spawn_service, ConfigError, ServiceConfig};
use objects_service::state::{AppState, StateError};
use store::Backend;

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override the HTTP listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Keep objects in memory instead of on disk
    #[arg(short, long)]
    pub memory: bool,

    /// Override the directory all buckets live under
    #[arg(short = 'd', long)]
    pub root_dir: Option<PathBuf>,

    /// PEM certificate chain; serves HTTPS together with --tls-key
    #[arg(long)]
    pub tls_cert: Option<PathBuf>,

    /// PEM private key; serves HTTPS together with --tls-cert
    #[arg(long)]
    pub tls_key: Option<PathBuf>,

    /// Also write daily rotated log files into this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Default log level, refined by RUST_LOG
    #[arg(long, default_value_t = tracing::Level::INFO)]
    pub log_level: tracing::Level,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl Daemon {
    /// Layer the command line flags over the persisted configuration
    fn service_config(&self, state: &AppState) -> Result<ServiceConfig, DaemonError> {
        let mut config = ServiceConfig::from_app_config(&state.config);

        if let Some(port) = self.port {
            config.listen_addr.set_port(port);
        }
        if self.memory {
            config.backend = Backend::Memory;
        }
        if let Some(root_dir) = &self.root_dir {
            config.root_dir = root_dir.clone();
        }
        if self.tls_cert.is_some() || self.tls_key.is_some() {
            config.tls =
                ServiceConfig::tls_from_paths(self.tls_cert.clone(), self.tls_key.clone())?;
        }

        config.log_level = self.log_level;
        config.log_dir = self.log_dir.clone();

        Ok(config)
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // Fall back to defaults when `objects init` was never run
        let state = AppState::load_or_default(ctx.config_path.clone())?;
        let config = self.service_config(&state)?;

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use objects_service::state::AppConfig;

    use super::*;

    #[derive(Parser)]
    struct TestArgs {
        #[command(flatten)]
        daemon: Daemon,
    }

    fn state(config: AppConfig) -> AppState {
        AppState {
            config_dir: PathBuf::from("/tmp/objects"),
            config_path: PathBuf::from("/tmp/objects/config.toml"),
            config,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let args = TestArgs::parse_from(["objects", "-p", "9000", "-m", "-d", "/srv/objects"]);
        let config = args.daemon.service_config(&state(AppConfig::default())).unwrap();

        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.root_dir, PathBuf::from("/srv/objects"));
        assert_eq!(config.log_level, tracing::Level::INFO);
    }

    #[test]
    fn test_config_used_without_flags() {
        let args = TestArgs::parse_from(["objects"]);
        let app_config = AppConfig {
            port: 7000,
            ..AppConfig::default()
        };
        let config = args.daemon.service_config(&state(app_config)).unwrap();

        assert_eq!(config.listen_addr.port(), 7000);
        assert_eq!(config.backend, Backend::Disk);
        assert!(config.tls.is_none());
    }

    #[test]
    fn test_tls_flags_must_come_in_pairs() {
        let args = TestArgs::parse_from(["objects", "--tls-cert", "cert.pem"]);
        let err = args
            .daemon
            .service_config(&state(AppConfig::default()))
            .unwrap_err();
        assert!(matches!(err, DaemonError::Config(ConfigError::MissingTlsKey)));

        let args = TestArgs::parse_from(["objects", "--tls-cert", "c.pem", "--tls-key", "k.pem"]);
        let config = args
            .daemon
            .service_config(&state(AppConfig::default()))
            .unwrap();
        assert_eq!(config.tls.unwrap().key_path, PathBuf::from("k.pem"));
    }
}
