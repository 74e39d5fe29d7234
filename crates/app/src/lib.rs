// Daemon/service modules (HTTP server, process shell)
pub mod daemon;

// App state (configuration, paths)
pub mod state;
pub mod version;

// Re-export key types for convenience
pub use daemon::http_server;
pub use daemon::ServiceConfig;
pub use daemon::ServiceState;
pub use daemon::{spawn_service, StateSetupError};
pub use state::{AppConfig, AppState, StateError, TlsConfig};
