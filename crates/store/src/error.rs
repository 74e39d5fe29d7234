//! Error types for the object store.

use std::path::PathBuf;

/// Errors returned by [`ObjectStore`](crate::ObjectStore) operations.
///
/// A missing bucket or object is never an error: lookups report absence
/// through `Option::None` or a `false` flag instead.
#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    /// The backend could not tell whether a path exists
    #[error("failed to check if {} exists: {source}", path.display())]
    ExistenceCheck {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory or file creation failed after a negative existence check
    #[error("failed to create {}: {source}", path.display())]
    Creation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Opening a path that was reported present failed
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing a path that was reported present failed
    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ObjectStoreError {
    /// Path the failing backend call was made against.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ObjectStoreError::ExistenceCheck { path, .. }
            | ObjectStoreError::Creation { path, .. }
            | ObjectStoreError::Open { path, .. }
            | ObjectStoreError::Remove { path, .. } => path,
        }
    }
}

/// Result type alias for object store operations.
pub type Result<T> = std::result::Result<T, ObjectStoreError>;
