//! Shared test utilities for object store integration tests
#![allow(dead_code)]

use std::io::SeekFrom;

use store::{Backend, FileHandle, ObjectStore};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

/// Set up a store on the in-memory backend
pub async fn memory_store() -> ObjectStore {
    ObjectStore::new("/tmp/store-test", Backend::Memory)
        .await
        .unwrap()
}

/// Set up a store on the disk backend, rooted in a fresh temporary directory
pub async fn disk_store() -> (ObjectStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = ObjectStore::new(temp_dir.path().join("objects"), Backend::Disk)
        .await
        .unwrap();
    (store, temp_dir)
}

/// Both backends, the disk one paired with the temp dir keeping it alive
pub async fn all_stores() -> Vec<(ObjectStore, Option<TempDir>)> {
    let (disk, temp_dir) = disk_store().await;
    vec![(memory_store().await, None), (disk, Some(temp_dir))]
}

/// Replace an object's content: write from offset zero, then truncate
pub async fn put(store: &ObjectStore, bucket: &str, object_id: &str, data: &[u8]) {
    store.create_bucket_if_not_exists(bucket).await.unwrap();
    let mut object = store.create_or_open_object(bucket, object_id).await.unwrap();
    object.seek(SeekFrom::Start(0)).await.unwrap();
    object.write_all(data).await.unwrap();
    object.flush().await.unwrap();
    object.set_len(data.len() as u64).await.unwrap();
}

/// Read a handle to the end
pub async fn read_all(mut object: FileHandle) -> Vec<u8> {
    let mut contents = Vec::new();
    object.read_to_end(&mut contents).await.unwrap();
    contents
}

/// Read an object that must exist
pub async fn get(store: &ObjectStore, bucket: &str, object_id: &str) -> Vec<u8> {
    let object = store
        .get_object_if_exists(bucket, object_id)
        .await
        .unwrap()
        .expect("object should exist");
    read_all(object).await
}
