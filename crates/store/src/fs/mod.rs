//! Filesystem backend abstraction (persistent disk or in-memory).
//!
//! The [`ObjectStore`](crate::ObjectStore) only ever talks to a
//! [`Filesystem`]. Both implementations must be observably equivalent for the
//! same sequence of calls: same existence answers, same content, same
//! error-vs-success outcome. The only difference is that [`MemoryFs`] state
//! dies with the process.

use std::fmt::Debug;
use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncSeek, AsyncWrite};

mod disk;
mod memory;

pub use disk::DiskFs;
pub use memory::{MemoryFile, MemoryFs};

/// Permission bits for bucket (and root) directories.
pub const DIR_MODE: u32 = 0o755;
/// Permission bits for newly created object files.
pub const FILE_MODE: u32 = 0o644;

/// An open file returned by a [`Filesystem`].
///
/// Reads, writes and seeks go through tokio's async I/O traits so callers can
/// use `AsyncReadExt`/`AsyncWriteExt`/`AsyncSeekExt` regardless of backend.
#[async_trait]
pub trait File: AsyncRead + AsyncWrite + AsyncSeek + Send + Unpin + Debug {
    /// Truncate or extend the file to exactly `len` bytes.
    async fn set_len(&mut self, len: u64) -> io::Result<()>;
}

/// Boxed file handle, independent of the backend that produced it.
pub type FileHandle = Box<dyn File>;

/// Capability the object store is written against.
#[async_trait]
pub trait Filesystem: Send + Sync + Debug {
    /// Whether a file or directory exists at `path`.
    ///
    /// Not-found is `Ok(false)`; any other failure (e.g. permission denied on
    /// a parent) is returned as an error.
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Create `path` and every missing ancestor with permission bits `mode`.
    /// Succeeds without changes if the directory already exists.
    async fn mkdir_all(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Create an empty read/write file, truncating any existing content.
    /// Fails if the parent directory does not exist.
    async fn create(&self, path: &Path) -> io::Result<FileHandle>;

    /// Open `path` for reading and writing without truncating it.
    async fn open_read_write(&self, path: &Path) -> io::Result<FileHandle>;

    /// Open an existing `path` for reading only.
    async fn open(&self, path: &Path) -> io::Result<FileHandle>;

    /// Remove the file (or empty directory) at `path`.
    async fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Which [`Filesystem`] implementation backs a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Persistent storage on the local disk
    #[default]
    Disk,
    /// Process-local in-memory tree (for tests and throwaway instances)
    Memory,
}

impl Backend {
    /// Map the `--memory` style flag onto a backend.
    pub fn from_memory_flag(memory: bool) -> Self {
        if memory {
            Backend::Memory
        } else {
            Backend::Disk
        }
    }

    /// Build a fresh filesystem of this kind.
    pub fn filesystem(self) -> Arc<dyn Filesystem> {
        match self {
            Backend::Disk => Arc::new(DiskFs),
            Backend::Memory => Arc::new(MemoryFs::new()),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Disk => write!(f, "disk"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

pub(crate) fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file or directory", path.display()),
    )
}

pub(crate) fn not_a_directory(path: &Path) -> io::Error {
    io::Error::other(format!("{}: not a directory", path.display()))
}

pub(crate) fn is_a_directory(path: &Path) -> io::Error {
    io::Error::other(format!("{}: is a directory", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_memory_flag() {
        assert_eq!(Backend::from_memory_flag(true), Backend::Memory);
        assert_eq!(Backend::from_memory_flag(false), Backend::Disk);
        assert_eq!(Backend::default(), Backend::Disk);
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(Backend::Disk.to_string(), "disk");
        assert_eq!(Backend::Memory.to_string(), "memory");
    }
}
