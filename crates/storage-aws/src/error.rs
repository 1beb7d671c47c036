//! Error types and SDK error classification for the AWS backend.

use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use s3_doctor_storage::ConnectError;
use thiserror::Error;

/// Errors specific to building the AWS backend client.
#[derive(Error, Debug)]
pub enum AwsBackendError {
    /// TLS context construction failed (bad bundle contents, etc).
    #[error("TLS configuration error: {message}")]
    TlsConfig { message: String },

    /// CA bundle could not be read.
    #[error("I/O error for {path}: {message}")]
    Io { path: String, message: String },
}

impl From<AwsBackendError> for ConnectError {
    fn from(err: AwsBackendError) -> Self {
        match err {
            AwsBackendError::TlsConfig { message } => ConnectError::Connection { message },
            AwsBackendError::Io { path, message } => ConnectError::Io { path, message },
        }
    }
}

/// Classify an SDK error from a connection probe.
///
/// Only a dispatch failure whose source chain mentions certificate or
/// handshake problems counts as a TLS validation failure; service-level
/// errors (auth, missing bucket) and plain network errors are fatal to the
/// fallback procedure.
pub(crate) fn classify_sdk_error<E, R>(err: &SdkError<E, R>) -> ConnectError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = format!("{}", DisplayErrorContext(err));
    if matches!(err, SdkError::DispatchFailure(_)) && message_indicates_tls_failure(&message) {
        ConnectError::TlsValidation { message }
    } else {
        ConnectError::Connection { message }
    }
}

/// Whether a dispatch failure's rendered source chain points at certificate
/// validation rather than a generic transport problem.
pub(crate) fn message_indicates_tls_failure(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["certificate", "handshake", "tls", "ssl", "x509"]
        .iter()
        .any(|marker| message.contains(marker))
}
