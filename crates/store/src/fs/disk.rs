//! Persistent-disk filesystem: every call maps onto one `tokio::fs` call.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs::{DirBuilder, OpenOptions};

use super::{is_a_directory, File, FileHandle, Filesystem, FILE_MODE};

#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

fn options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true).write(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);
    options
}

/// Directories can be opened on some platforms; objects never are.
async fn reject_directory(path: &Path) -> io::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => Err(is_a_directory(path)),
        _ => Ok(()),
    }
}

#[async_trait]
impl File for tokio::fs::File {
    async fn set_len(&mut self, len: u64) -> io::Result<()> {
        tokio::fs::File::set_len(self, len).await
    }
}

#[async_trait]
impl Filesystem for DiskFs {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        tokio::fs::try_exists(path).await
    }

    async fn mkdir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(mode);
        #[cfg(not(unix))]
        let _ = mode;
        builder.create(path).await
    }

    async fn create(&self, path: &Path) -> io::Result<FileHandle> {
        let file = options().create(true).truncate(true).open(path).await?;
        Ok(Box::new(file))
    }

    async fn open_read_write(&self, path: &Path) -> io::Result<FileHandle> {
        reject_directory(path).await?;
        let file = options().create(true).open(path).await?;
        Ok(Box::new(file))
    }

    async fn open(&self, path: &Path) -> io::Result<FileHandle> {
        reject_directory(path).await?;
        let file = tokio::fs::File::open(path).await?;
        Ok(Box::new(file))
    }

    async fn remove(&self, path: &Path) -> io::Result<()> {
        if tokio::fs::metadata(path).await?.is_dir() {
            tokio::fs::remove_dir(path).await
        } else {
            tokio::fs::remove_file(path).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::DIR_MODE;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_disk_create_write_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fs = DiskFs;
        let path = temp_dir.path().join("object");

        assert!(!fs.exists(&path).await.unwrap());

        let mut file = fs.create(&path).await.unwrap();
        file.write_all(b"hello").await.unwrap();
        file.flush().await.unwrap();
        drop(file);

        assert!(fs.exists(&path).await.unwrap());

        let mut contents = Vec::new();
        fs.open(&path)
            .await
            .unwrap()
            .read_to_end(&mut contents)
            .await
            .unwrap();
        assert_eq!(contents, b"hello");

        // Verify file exists on disk
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_disk_create_requires_parent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fs = DiskFs;

        let err = fs
            .create(&temp_dir.path().join("missing").join("object"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_disk_mkdir_all_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let fs = DiskFs;
        let path = temp_dir.path().join("a").join("b");

        fs.mkdir_all(&path, DIR_MODE).await.unwrap();
        // second call is a no-op
        fs.mkdir_all(&path, DIR_MODE).await.unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.is_dir());
        // umask may clear bits but never adds any
        assert_eq!(metadata.permissions().mode() & !0o755 & 0o777, 0);
    }

    #[tokio::test]
    async fn test_disk_open_directory_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fs = DiskFs;
        let path = temp_dir.path().join("bucket");
        fs.mkdir_all(&path, DIR_MODE).await.unwrap();

        assert!(fs.open(&path).await.is_err());
        assert!(fs.open_read_write(&path).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_disk_exists_below_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fs = DiskFs;
        let path = temp_dir.path().join("object");
        fs.create(&path).await.unwrap();

        assert!(fs.exists(&path.join("child")).await.is_err());
    }

    #[tokio::test]
    async fn test_disk_remove() {
        let temp_dir = tempfile::tempdir().unwrap();
        let fs = DiskFs;
        let path = temp_dir.path().join("object");

        fs.create(&path).await.unwrap();
        fs.remove(&path).await.unwrap();
        assert!(!fs.exists(&path).await.unwrap());

        let err = fs.remove(&path).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
