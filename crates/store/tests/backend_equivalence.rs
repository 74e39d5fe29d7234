//! The same call sequence must be observably identical on disk and in memory

mod common;

use std::path::Path;

use store::{Backend, ObjectStore, Result as StoreResult};
use tokio::io::AsyncWriteExt;

/// Outcome of each step, as seen by a caller
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Ok,
    Err,
    Absent,
    Present(Vec<u8>),
    Removed(bool),
}

async fn run_sequence(store: &ObjectStore) -> Vec<Step> {
    let mut steps = Vec::new();

    let ok = |result: StoreResult<()>| if result.is_ok() { Step::Ok } else { Step::Err };

    steps.push(ok(store.create_bucket_if_not_exists("b").await));

    let mut object = store.create_or_open_object("b", "o").await.unwrap();
    object.write_all(b"hello").await.unwrap();
    object.flush().await.unwrap();
    drop(object);

    // a nested bucket, then addressed as an object of its parent
    steps.push(ok(store.create_bucket_if_not_exists("b/sub").await));

    // "b/sub" is a directory, "b/o" is a regular file
    for (bucket, object_id) in [
        ("b", "o"),
        ("b", "missing"),
        ("other", "o"),
        ("b", "sub"),
        ("b/o", "x"),
    ] {
        steps.push(match store.get_object_if_exists(bucket, object_id).await {
            Ok(Some(object)) => Step::Present(common::read_all(object).await),
            Ok(None) => Step::Absent,
            Err(_) => Step::Err,
        });
    }

    // writing into a bucket that was never created fails the same way
    steps.push(match store.create_or_open_object("nope", "o").await {
        Ok(_) => Step::Ok,
        Err(_) => Step::Err,
    });

    for _ in 0..2 {
        steps.push(match store.remove_object_if_exists("b", "o").await {
            Ok(removed) => Step::Removed(removed),
            Err(_) => Step::Err,
        });
    }

    steps.push(ok(store.create_bucket_if_not_exists("b").await));
    steps
}

#[tokio::test]
async fn test_backend_equivalence() {
    let memory = common::memory_store().await;
    let (disk, _temp) = common::disk_store().await;

    let memory_steps = run_sequence(&memory).await;
    let disk_steps = run_sequence(&disk).await;

    assert_eq!(memory_steps, disk_steps);
    assert_eq!(
        memory_steps,
        vec![
            Step::Ok,
            Step::Ok,
            Step::Present(b"hello".to_vec()),
            Step::Absent,
            Step::Absent,
            Step::Err,
            Step::Err,
            Step::Err,
            Step::Removed(true),
            Step::Removed(false),
            Step::Ok,
        ]
    );
}

#[tokio::test]
async fn test_disk_layout() {
    let (store, temp_dir) = common::disk_store().await;
    common::put(&store, "bucket", "object", b"on disk").await;

    let path = temp_dir.path().join("objects").join("bucket").join("object");
    assert_eq!(std::fs::read(path).unwrap(), b"on disk");
}

#[tokio::test]
async fn test_memory_state_is_per_store() {
    let first = ObjectStore::new("root", Backend::Memory).await.unwrap();
    let second = ObjectStore::new("root", Backend::Memory).await.unwrap();

    common::put(&first, "bucket", "object", b"data").await;
    assert!(second
        .get_object_if_exists("bucket", "object")
        .await
        .unwrap()
        .is_none());

    // nothing leaked onto the real filesystem
    assert!(!Path::new("root/bucket/object").exists());
}
