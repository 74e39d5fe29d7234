//! Bucket/Object Store
//!
//! This crate maps `(bucket, object id)` addressing onto a hierarchical
//! filesystem laid out as `root/bucket/object`. The store is written against
//! the [`Filesystem`] trait only, so the same code runs on top of the
//! persistent disk or a process-local in-memory tree.
//!
//! # Example
//!
//! ```rust,no_run
//! use store::{Backend, ObjectStore};
//! use tokio::io::AsyncWriteExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ObjectStore::new("/tmp/objects", Backend::Memory).await?;
//!
//! store.create_bucket_if_not_exists("images").await?;
//! let mut object = store.create_or_open_object("images", "logo.png").await?;
//! object.write_all(&[0xde, 0xad, 0xbe, 0xef]).await?;
//! object.flush().await?;
//!
//! assert!(store.get_object_if_exists("images", "logo.png").await?.is_some());
//! # Ok(())
//! # }
//! ```

mod error;
pub mod fs;
mod object_store;

pub use error::{ObjectStoreError, Result};
pub use fs::{Backend, DiskFs, File, FileHandle, Filesystem, MemoryFs, DIR_MODE, FILE_MODE};
pub use object_store::ObjectStore;
