//! In-memory filesystem: a process-local tree keyed by normalized path.

use std::collections::HashMap;
use std::io::{self, SeekFrom};
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::io::{AsyncRead, AsyncSeek, AsyncWrite, ReadBuf};

use super::{is_a_directory, not_a_directory, not_found, File, FileHandle, Filesystem};

type Contents = Arc<RwLock<Vec<u8>>>;

#[derive(Debug, Clone)]
enum Node {
    Dir {
        #[allow(dead_code)]
        mode: u32,
    },
    File(Contents),
}

/// Volatile [`Filesystem`] whose state is discarded with the process.
///
/// Paths are normalized lexically (`.`, `..` and repeated separators) so that
/// `a/./b` and `a/b` address the same node. The empty path and `/` always
/// exist as directories.
#[derive(Debug, Default)]
pub struct MemoryFs {
    nodes: RwLock<HashMap<PathBuf, Node>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(contents: Contents, writable: bool) -> FileHandle {
        Box::new(MemoryFile {
            contents,
            position: 0,
            writable,
        })
    }

    /// Look up `path` as a regular file, creating it under an existing
    /// directory when `create` is set. Existing contents are cleared in place
    /// when `truncate` is set, so already-open handles observe the truncation.
    fn file(&self, path: &Path, create: bool, truncate: bool) -> io::Result<Contents> {
        let path = normalize(path);
        let mut nodes = self.nodes.write();

        match nodes.get(&path) {
            Some(Node::File(contents)) => {
                if truncate {
                    contents.write().clear();
                }
                return Ok(contents.clone());
            }
            Some(Node::Dir { .. }) => return Err(is_a_directory(&path)),
            None if is_root(&path) => return Err(is_a_directory(&path)),
            None if !create => return Err(not_found(&path)),
            None => {}
        }

        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        match nodes.get(parent) {
            Some(Node::Dir { .. }) => {}
            None if is_root(parent) => {}
            Some(Node::File(_)) => return Err(not_a_directory(parent)),
            None => return Err(not_found(parent)),
        }

        let contents = Contents::default();
        nodes.insert(path, Node::File(contents.clone()));
        Ok(contents)
    }
}

#[async_trait]
impl Filesystem for MemoryFs {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        let path = normalize(path);
        let nodes = self.nodes.read();

        // a regular file can not have children
        let mut ancestors = path.ancestors().skip(1).filter(|p| !is_root(p));
        if ancestors.any(|dir| matches!(nodes.get(dir), Some(Node::File(_)))) {
            return Err(not_a_directory(&path));
        }

        Ok(is_root(&path) || nodes.contains_key(&path))
    }

    async fn mkdir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.nodes.write();

        let mut ancestors: Vec<&Path> = path.ancestors().filter(|p| !is_root(p)).collect();
        ancestors.reverse();

        for dir in ancestors {
            match nodes.get(dir) {
                Some(Node::Dir { .. }) => {}
                Some(Node::File(_)) => return Err(not_a_directory(dir)),
                None => {
                    nodes.insert(dir.to_path_buf(), Node::Dir { mode });
                }
            }
        }

        Ok(())
    }

    async fn create(&self, path: &Path) -> io::Result<FileHandle> {
        let contents = self.file(path, true, true)?;
        Ok(Self::handle(contents, true))
    }

    async fn open_read_write(&self, path: &Path) -> io::Result<FileHandle> {
        let contents = self.file(path, true, false)?;
        Ok(Self::handle(contents, true))
    }

    async fn open(&self, path: &Path) -> io::Result<FileHandle> {
        let contents = self.file(path, false, false)?;
        Ok(Self::handle(contents, false))
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.nodes.write();

        match nodes.get(&path) {
            Some(Node::File(_)) => {}
            Some(Node::Dir { .. }) => {
                if nodes.keys().any(|key| key.parent() == Some(path.as_path())) {
                    return Err(io::Error::other(format!(
                        "{}: directory not empty",
                        path.display()
                    )));
                }
            }
            None if is_root(&path) => {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("{}: cannot remove root directory", path.display()),
                ))
            }
            None => return Err(not_found(&path)),
        }

        // open handles keep their own reference to the contents
        nodes.remove(&path);
        Ok(())
    }
}

/// Open file on a [`MemoryFs`]. Reads and writes complete immediately.
#[derive(Debug)]
pub struct MemoryFile {
    contents: Contents,
    position: u64,
    writable: bool,
}

impl MemoryFile {
    fn check_writable(&self) -> io::Result<()> {
        if self.writable {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "file was opened read-only",
            ))
        }
    }
}

#[async_trait]
impl File for MemoryFile {
    async fn set_len(&mut self, len: u64) -> io::Result<()> {
        self.check_writable()?;
        self.contents.write().resize(to_usize(len)?, 0);
        Ok(())
    }
}

impl AsyncRead for MemoryFile {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let contents = this.contents.read();

        let start = usize::try_from(this.position)
            .unwrap_or(usize::MAX)
            .min(contents.len());
        let len = buf.remaining().min(contents.len() - start);
        buf.put_slice(&contents[start..start + len]);

        this.position += len as u64;
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MemoryFile {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if let Err(e) = this.check_writable() {
            return Poll::Ready(Err(e));
        }

        let start = match to_usize(this.position) {
            Ok(start) => start,
            Err(e) => return Poll::Ready(Err(e)),
        };
        let Some(end) = start.checked_add(buf.len()) else {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "write would overflow the file length",
            )));
        };

        let mut contents = this.contents.write();
        if contents.len() < end {
            contents.resize(end, 0);
        }
        contents[start..end].copy_from_slice(buf);

        this.position = end as u64;
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl AsyncSeek for MemoryFile {
    fn start_seek(self: Pin<&mut Self>, position: SeekFrom) -> io::Result<()> {
        let this = self.get_mut();
        let (base, offset) = match position {
            SeekFrom::Start(n) => {
                this.position = n;
                return Ok(());
            }
            SeekFrom::End(offset) => (this.contents.read().len() as u64, offset),
            SeekFrom::Current(offset) => (this.position, offset),
        };

        this.position = base.checked_add_signed(offset).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )
        })?;
        Ok(())
    }

    fn poll_complete(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        Poll::Ready(Ok(self.position))
    }
}

/// Lexically normalize `path`, the way `filepath.Clean` style helpers do.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// The empty path and `/` have no parent and always exist.
fn is_root(path: &Path) -> bool {
    path.parent().is_none()
}

fn to_usize(n: u64) -> io::Result<usize> {
    usize::try_from(n).map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "offset too large"))
}
