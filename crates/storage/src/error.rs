//! Error types for connection and object-store operations.

use thiserror::Error;

/// Errors from establishing a connection to the object store.
#[derive(Error, Debug, Clone)]
pub enum ConnectError {
    /// The server's certificate could not be validated under the current
    /// verify spec. Triggers the fallback chain.
    #[error("TLS validation failed: {message}")]
    TlsValidation { message: String },

    /// Any other connection or authentication failure. Never retried.
    #[error("Connection failed: {message}")]
    Connection { message: String },

    /// The server's certificate chain could not be fetched for bundle
    /// extraction.
    #[error("Certificate chain fetch failed: {message}")]
    ChainFetch { message: String },

    /// Local I/O failure while persisting the extracted bundle.
    #[error("I/O error for {path}: {message}")]
    Io { path: String, message: String },
}

impl ConnectError {
    /// Whether the fallback procedure may move on to the next trust mode.
    /// Only TLS validation failures are retryable; everything else aborts.
    pub fn is_tls_failure(&self) -> bool {
        matches!(self, ConnectError::TlsValidation { .. })
    }
}

/// Errors that can occur during object-store operations.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// Object not found.
    #[error("Object not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Network or service error.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Downloaded bytes differ from the uploaded bytes. Raised by the
    /// round-trip verification step, never swallowed.
    #[error("Downloaded content does not match uploaded content for {key}: expected {expected_len} bytes, got {actual_len}")]
    ContentMismatch {
        key: String,
        expected_len: usize,
        actual_len: usize,
    },

    /// Local I/O error.
    #[error("I/O error for {path}: {message}")]
    Io { path: String, message: String },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}
