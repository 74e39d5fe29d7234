use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use store::Backend;

pub const APP_NAME: &str = "objects";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Paths to a TLS certificate chain and its private key, both PEM encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the HTTP server
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory all buckets live under
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    /// Keep objects in memory instead of on disk
    #[serde(default)]
    pub memory: bool,
    /// Upper bound on request bodies; unset or zero means unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_body_bytes: Option<usize>,
    /// Serve HTTPS with these credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
}

fn default_port() -> u16 {
    8080
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            root_dir: default_root_dir(),
            memory: false,
            max_body_bytes: None,
            tls: None,
        }
    }
}

impl AppConfig {
    pub fn backend(&self) -> Backend {
        Backend::from_memory_flag(self.memory)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the config directory (~/.objects)
    pub config_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the config directory path (custom or default ~/.objects)
    pub fn config_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new config directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let config_dir = Self::config_dir(custom_path)?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&config_dir)?;

        let config = config.unwrap_or_default();
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            config_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the config directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let config_dir = Self::config_dir(custom_path)?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            config_dir,
            config_path,
            config,
        })
    }

    /// Load existing state, or fall back to defaults when nothing was initialized
    pub fn load_or_default(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        match Self::load(custom_path.clone()) {
            Err(StateError::NotInitialized) => {
                let config_dir = Self::config_dir(custom_path)?;
                Ok(Self {
                    config_path: config_dir.join(CONFIG_FILE_NAME),
                    config_dir,
                    config: AppConfig::default(),
                })
            }
            result => result,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("config directory not initialized. Run 'objects init' first")]
    NotInitialized,

    #[error("config directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
