//! Object-store trait - the minimal S3 surface the diagnostics exercise.

use async_trait::async_trait;

use crate::error::StorageError;

/// Information about an object from list operations.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    /// Object key.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last modified timestamp (Unix epoch seconds).
    pub last_modified: Option<i64>,
    /// ETag.
    pub etag: Option<String>,
}

/// Low-level object operations - implemented by each backend.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload bytes. A key with a trailing slash and an empty body acts as a
    /// folder marker.
    async fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Download an object to bytes.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// List objects under a prefix, draining all pages.
    async fn list_objects(&self, bucket: &str, prefix: &str)
        -> Result<Vec<ObjectInfo>, StorageError>;

    /// Delete an object.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError>;

    /// List bucket names. Used as a cheap connection probe.
    async fn list_buckets(&self) -> Result<Vec<String>, StorageError>;
}
