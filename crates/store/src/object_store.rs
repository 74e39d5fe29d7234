//! Bucket/object lifecycle on top of a [`Filesystem`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ObjectStoreError, Result};
use crate::fs::{Backend, FileHandle, Filesystem, DIR_MODE};

/// Maps `(bucket, object id)` onto `root/bucket/object` in a [`Filesystem`].
///
/// The store holds nothing but the root path and the backend handle, both
/// immutable after construction, so a single instance can be shared across
/// request tasks behind an `Arc`.
///
/// Every operation is an existence check followed by a conditional action.
/// The two steps are not atomic: a concurrent call on the same object may
/// interleave between them, in which case the error of the second step is
/// what the caller sees.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
    backend: Backend,
    fs: Arc<dyn Filesystem>,
}

impl ObjectStore {
    /// Create a store rooted at `root` on a fresh filesystem of kind `backend`.
    ///
    /// The root directory (and any missing ancestors) is created up front.
    pub async fn new(root: impl Into<PathBuf>, backend: Backend) -> Result<Self> {
        let root = root.into();
        tracing::info!(root = %root.display(), %backend, "creating object store");
        Self::with_filesystem(root, backend, backend.filesystem()).await
    }

    /// Create a store over an existing filesystem handle.
    pub async fn with_filesystem(
        root: impl Into<PathBuf>,
        backend: Backend,
        fs: Arc<dyn Filesystem>,
    ) -> Result<Self> {
        let root = root.into();
        if let Err(source) = fs.mkdir_all(&root, DIR_MODE).await {
            tracing::error!(
                root = %root.display(),
                error = %source,
                "can not create root directory"
            );
            return Err(ObjectStoreError::Creation { path: root, source });
        }

        Ok(Self { root, backend, fs })
    }

    /// Directory all buckets live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Kind of filesystem backing this store.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Whether the root directory is still reachable through the backend.
    pub async fn is_available(&self) -> Result<bool> {
        self.check_exists(&self.root).await
    }

    fn bucket_path(&self, bucket: &str) -> PathBuf {
        self.root.join(bucket)
    }

    fn object_path(&self, bucket: &str, object_id: &str) -> PathBuf {
        self.root.join(bucket).join(object_id)
    }

    async fn check_exists(&self, path: &Path) -> Result<bool> {
        self.fs.exists(path).await.map_err(|source| {
            tracing::error!(
                path = %path.display(),
                error = %source,
                "failed to check if path exists"
            );
            ObjectStoreError::ExistenceCheck {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Create the bucket directory unless it already exists.
    ///
    /// Idempotent. A creation failure is returned to the caller like any other
    /// error; it does not take the process down.
    pub async fn create_bucket_if_not_exists(&self, bucket: &str) -> Result<()> {
        let bucket_path = self.bucket_path(bucket);

        if self.check_exists(&bucket_path).await? {
            return Ok(());
        }

        tracing::debug!(bucket, "creating bucket");
        self.fs
            .mkdir_all(&bucket_path, DIR_MODE)
            .await
            .map_err(|source| {
                tracing::error!(
                    bucket_path = %bucket_path.display(),
                    error = %source,
                    "can not create bucket"
                );
                ObjectStoreError::Creation {
                    path: bucket_path.clone(),
                    source,
                }
            })
    }

    /// Open the object for writing, creating it empty if it does not exist.
    ///
    /// The bucket must already exist. An existing object is opened read/write
    /// *without* truncation and positioned at offset zero: to replace its
    /// content the caller writes from the start and then calls
    /// [`File::set_len`](crate::File::set_len) with the new length.
    pub async fn create_or_open_object(&self, bucket: &str, object_id: &str) -> Result<FileHandle> {
        let object_path = self.object_path(bucket, object_id);

        if self.check_exists(&object_path).await? {
            return self
                .fs
                .open_read_write(&object_path)
                .await
                .map_err(|source| {
                    tracing::error!(
                        object_path = %object_path.display(),
                        error = %source,
                        "can not open object"
                    );
                    ObjectStoreError::Open {
                        path: object_path.clone(),
                        source,
                    }
                });
        }

        self.fs.create(&object_path).await.map_err(|source| {
            tracing::error!(
                object_path = %object_path.display(),
                error = %source,
                "can not create object"
            );
            ObjectStoreError::Creation {
                path: object_path.clone(),
                source,
            }
        })
    }

    /// Open the object for reading, or `None` if it does not exist.
    pub async fn get_object_if_exists(
        &self,
        bucket: &str,
        object_id: &str,
    ) -> Result<Option<FileHandle>> {
        let object_path = self.object_path(bucket, object_id);

        if !self.check_exists(&object_path).await? {
            return Ok(None);
        }

        match self.fs.open(&object_path).await {
            Ok(file) => Ok(Some(file)),
            Err(source) => {
                tracing::error!(
                    object_path = %object_path.display(),
                    error = %source,
                    "can not open object"
                );
                Err(ObjectStoreError::Open {
                    path: object_path,
                    source,
                })
            }
        }
    }

    /// Remove the object. Returns `false` (not an error) if it did not exist.
    pub async fn remove_object_if_exists(&self, bucket: &str, object_id: &str) -> Result<bool> {
        let object_path = self.object_path(bucket, object_id);

        if !self.check_exists(&object_path).await? {
            return Ok(false);
        }

        match self.fs.remove(&object_path).await {
            Ok(()) => Ok(true),
            Err(source) => {
                tracing::error!(
                    object_path = %object_path.display(),
                    error = %source,
                    "can not remove object"
                );
                Err(ObjectStoreError::Remove {
                    path: object_path,
                    source,
                })
            }
        }
    }
}
