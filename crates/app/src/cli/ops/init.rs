use std::path::PathBuf;

use clap::Args;

use objects_service::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// HTTP server listen port
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Directory all buckets live under
    #[arg(long, default_value = "./data")]
    pub root_dir: PathBuf,

    /// Keep objects in memory instead of on disk
    #[arg(long)]
    pub memory: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            port: self.port,
            root_dir: self.root_dir.clone(),
            memory: self.memory,
            ..AppConfig::default()
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized objects directory at: {}\n\
             - Config: {}\n\
             - Port: {}\n\
             - Root directory: {}\n\
             - Backend: {}",
            state.config_dir.display(),
            state.config_path.display(),
            state.config.port,
            state.config.root_dir.display(),
            state.config.backend(),
        );

        Ok(output)
    }
}
