use std::sync::Arc;

use store::{ObjectStore, ObjectStoreError};

use super::config::Config;

/// Main service state, shared by every request handler
#[derive(Clone, Debug)]
pub struct State {
    store: Arc<ObjectStore>,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        tracing::info!(
            root_dir = %config.root_dir.display(),
            backend = %config.backend,
            "ServiceState::from_config - opening object store"
        );
        let store = ObjectStore::new(config.root_dir.clone(), config.backend).await?;

        Ok(Self::new(store))
    }

    pub fn new(store: ObjectStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("object store setup error: {0}")]
    ObjectStore(#[from] ObjectStoreError),
}
