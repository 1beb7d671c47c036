//! Integration tests for the diagnostic object tasks over an in-memory
//! object store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use s3_doctor_common::StepReporter;
use s3_doctor_storage::{
    cleanup, list_all_keys, run_scenario_tasks, ObjectInfo, ObjectStore, StorageError,
};

const BUCKET: &str = "diagnostics";

/// In-memory object store keyed by object key. BTreeMap keeps listings in
/// lexicographic order, like S3.
#[derive(Default)]
struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    /// When set, get_object returns these bytes instead of the stored ones.
    corrupt_downloads_with: Option<Vec<u8>>,
    /// Keys whose deletion fails.
    undeletable: Vec<String>,
}

impl MemoryStore {
    fn new() -> Self {
        Self::default()
    }

    fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(&self, _bucket: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.objects.lock().unwrap().insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        if let Some(ref corrupted) = self.corrupt_downloads_with {
            return Ok(corrupted.clone());
        }
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn list_objects(
        &self,
        _bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectInfo>, StorageError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, data)| ObjectInfo {
                key: key.clone(),
                size: data.len() as u64,
                last_modified: None,
                etag: None,
            })
            .collect())
    }

    async fn delete_object(&self, _bucket: &str, key: &str) -> Result<(), StorageError> {
        if self.undeletable.iter().any(|k| k == key) {
            return Err(StorageError::Network {
                message: "AccessDenied".into(),
            });
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<String>, StorageError> {
        Ok(vec![BUCKET.to_string()])
    }
}

#[tokio::test]
async fn scenario_round_trip_creates_marker_and_file() {
    let store = MemoryStore::new();
    let mut reporter = StepReporter::new(Vec::new());

    let created = run_scenario_tasks(
        &store,
        BUCKET,
        "test/tls_default/",
        b"Content for TLS default connection.",
        &mut reporter,
        "tls_default",
    )
    .await
    .unwrap();

    assert_eq!(
        created,
        [
            "test/tls_default/".to_string(),
            "test/tls_default/file_test_tls_default.txt".to_string()
        ]
    );
    assert!(store.contains("test/tls_default/"));
    assert!(store.contains("test/tls_default/file_test_tls_default.txt"));

    let output = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(output.contains("Created folder: test/tls_default/"));
    assert!(output.contains("Downloaded and verified file:"));
}

#[tokio::test]
async fn corrupted_download_surfaces_as_content_mismatch() {
    let store = MemoryStore {
        corrupt_downloads_with: Some(b"tampered".to_vec()),
        ..MemoryStore::new()
    };
    let mut reporter = StepReporter::new(Vec::new());

    let err = run_scenario_tasks(
        &store,
        BUCKET,
        "test/tls_default/",
        b"original content",
        &mut reporter,
        "tls_default",
    )
    .await
    .unwrap_err();

    match err {
        StorageError::ContentMismatch {
            key,
            expected_len,
            actual_len,
        } => {
            assert_eq!(key, "test/tls_default/file_test_tls_default.txt");
            assert_eq!(expected_len, b"original content".len());
            assert_eq!(actual_len, b"tampered".len());
        }
        other => panic!("expected ContentMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn full_listing_includes_marker_and_file_verbatim() {
    let store = MemoryStore::new();
    store.put_object(BUCKET, "test/a/", &[]).await.unwrap();
    store
        .put_object(BUCKET, "test/a/file_a.txt", b"a")
        .await
        .unwrap();

    let keys = list_all_keys(&store, BUCKET).await.unwrap();
    assert!(keys.contains(&"test/a/".to_string()));
    assert!(keys.contains(&"test/a/file_a.txt".to_string()));
}

#[tokio::test]
async fn cleanup_continues_past_failures() {
    let store = MemoryStore {
        undeletable: vec!["test/a/".to_string()],
        ..MemoryStore::new()
    };
    store.put_object(BUCKET, "test/a/", &[]).await.unwrap();
    store
        .put_object(BUCKET, "test/a/file_a.txt", b"a")
        .await
        .unwrap();

    let keys = vec!["test/a/".to_string(), "test/a/file_a.txt".to_string()];
    let mut reporter = StepReporter::new(Vec::new());
    cleanup(&store, BUCKET, &keys, &mut reporter, "CLEANUP").await;

    // The failing key is reported and the next one is still deleted.
    assert!(store.contains("test/a/"));
    assert!(!store.contains("test/a/file_a.txt"));

    let output = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(output.contains("[CLEANUP] [ERROR] Failed to delete test/a/"));
    assert!(output.contains("[CLEANUP] [SUCCESS] Deleted: test/a/file_a.txt"));
}
